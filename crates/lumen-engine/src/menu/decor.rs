use rand::rngs::ThreadRng;

use crate::coords::Dimension;
use crate::device::Canvas2d;
use crate::paint::Color;

use super::Starfield;

/// Main menu background state: sky and cloud colors plus the starfield.
pub struct MenuDecor {
    sky_color: Color,
    clouds_color: Color,
    stars_enabled: bool,
    starfield: Starfield,
    rng: ThreadRng,
}

impl Default for MenuDecor {
    fn default() -> Self {
        Self {
            sky_color: Self::DEFAULT_SKY,
            clouds_color: Self::DEFAULT_CLOUDS,
            stars_enabled: true,
            starfield: Starfield::new(),
            rng: rand::thread_rng(),
        }
    }
}

impl MenuDecor {
    pub const DEFAULT_SKY: Color = Color::new(255, 140, 186, 250);
    pub const DEFAULT_CLOUDS: Color = Color::new(255, 240, 240, 255);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn sky_color(&self) -> Color {
        self.sky_color
    }

    pub fn set_sky_color(&mut self, color: Color) {
        self.sky_color = color;
    }

    pub fn clouds_color(&self) -> Color {
        self.clouds_color
    }

    pub fn set_clouds_color(&mut self, color: Color) {
        self.clouds_color = color;
    }

    pub fn stars_enabled(&self) -> bool {
        self.stars_enabled
    }

    pub fn set_stars_enabled(&mut self, enabled: bool) {
        self.stars_enabled = enabled;
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    /// Advances and draws the starfield on a window of `size`.
    pub fn draw_stars(&mut self, canvas: Option<&mut dyn Canvas2d>, size: Dimension, dtime: f32) {
        self.starfield
            .draw(canvas, &mut self.rng, size, dtime, self.stars_enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RecordingCanvas;
    use crate::menu::STAR_COUNT;

    #[test]
    fn defaults() {
        let decor = MenuDecor::new();
        assert_eq!(decor.sky_color(), Color::new(255, 140, 186, 250));
        assert_eq!(decor.clouds_color(), Color::new(255, 240, 240, 255));
        assert!(decor.stars_enabled());
    }

    #[test]
    fn stars_follow_enabled_flag() {
        let mut decor = MenuDecor::new();
        let mut canvas = RecordingCanvas::new(640, 480);

        decor.set_stars_enabled(false);
        decor.draw_stars(Some(&mut canvas), Dimension::new(640, 480), 0.016);
        assert!(canvas.rects.is_empty());

        decor.set_stars_enabled(true);
        decor.draw_stars(Some(&mut canvas), Dimension::new(640, 480), 0.016);
        assert_eq!(canvas.rects.len(), STAR_COUNT);
    }
}
