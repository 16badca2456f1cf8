use std::f32::consts::TAU;

use rand::Rng;

use crate::coords::{Dimension, ScreenRect};
use crate::device::Canvas2d;
use crate::paint::Color;

/// Number of stars in a generated field.
pub const STAR_COUNT: usize = 96;

/// A star in normalized window coordinates (`0..1` of width/height).
/// `size` is relative to the window height.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Twinkling star decoration drawn behind the main menu.
#[derive(Debug, Default)]
pub struct Starfield {
    stars: Vec<Star>,
    time: f32,
}

impl Starfield {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Animation phase in radians, in `0..=TAU`.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Replaces the field with [`STAR_COUNT`] random stars for a window of
    /// `size`. Positions are quantized to whole pixels of that window.
    pub fn generate(&mut self, rng: &mut impl Rng, size: Dimension) {
        let w = size.width.max(1);
        let h = size.height.max(1);

        self.stars.clear();
        self.stars.reserve(STAR_COUNT);
        for _ in 0..STAR_COUNT {
            let x = (rng.r#gen::<u32>() % w) as f32 / w as f32;
            let y = (rng.r#gen::<u32>() % h) as f32 / h as f32;
            let size = (rng.r#gen::<u32>() % 8 + 4) as f32 * 0.0004;
            self.stars.push(Star { x, y, size });
        }
    }

    /// Advances the animation by `dtime` seconds and draws the field.
    ///
    /// The phase advances even when nothing is drawn. With `enabled` false or
    /// no canvas this is otherwise a no-op; an empty field is generated first.
    pub fn draw(
        &mut self,
        canvas: Option<&mut dyn Canvas2d>,
        rng: &mut impl Rng,
        size: Dimension,
        dtime: f32,
        enabled: bool,
    ) {
        self.time += dtime;
        if self.time > TAU {
            self.time = 0.0;
        }

        if !enabled {
            return;
        }
        let Some(canvas) = canvas else { return };

        if self.stars.is_empty() {
            self.generate(rng, size);
        }

        let w = size.width as f32;
        let h = size.height as f32;
        for star in &self.stars {
            // Whole pixels first: the twinkle phase and the square shape
            // both derive from the truncated position and size.
            let x = (star.x * w) as i32;
            let y = (star.y * h) as i32;
            let px = ((star.size * h) as i32).max(1);

            let alpha = star_alpha(x as f32, y as f32, self.time);
            let rect = ScreenRect::new(x, y, x + px, y + px);
            canvas.draw_2d_rectangle(Color::WHITE.with_alpha(alpha), rect);
        }
    }
}

/// Twinkle brightness in `0..=128` for a star at pixel `(x, y)`.
pub fn star_brightness(x: f32, y: f32, time: f32) -> f32 {
    let seed = x * 12.9898 + y * 78.233;
    128.0 * ((time + seed).sin() / 2.0 + 0.5)
}

/// Alpha of a star: brightness lifted by 64, clamped to a byte.
pub fn star_alpha(x: f32, y: f32, time: f32) -> u8 {
    (star_brightness(x, y, time) + 64.0).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::device::RecordingCanvas;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    // ── generation ────────────────────────────────────────────────────────

    #[test]
    fn generates_exactly_96_normalized_stars() {
        let mut field = Starfield::new();
        field.generate(&mut rng(), Dimension::new(800, 600));
        assert_eq!(field.stars().len(), STAR_COUNT);
        for s in field.stars() {
            assert!((0.0..1.0).contains(&s.x));
            assert!((0.0..1.0).contains(&s.y));
            assert!(s.size >= 4.0 * 0.0004 - f32::EPSILON);
            assert!(s.size <= 11.0 * 0.0004 + f32::EPSILON);
        }
    }

    #[test]
    fn regenerating_keeps_count() {
        let mut field = Starfield::new();
        let mut r = rng();
        field.generate(&mut r, Dimension::new(800, 600));
        field.generate(&mut r, Dimension::new(320, 200));
        assert_eq!(field.stars().len(), STAR_COUNT);
    }

    #[test]
    fn zero_sized_window_does_not_divide_by_zero() {
        let mut field = Starfield::new();
        field.generate(&mut rng(), Dimension::new(0, 0));
        assert!(field.stars().iter().all(|s| s.x == 0.0 && s.y == 0.0));
    }

    // ── brightness ────────────────────────────────────────────────────────

    #[test]
    fn brightness_is_deterministic() {
        assert_eq!(star_brightness(10.0, 20.0, 1.5), star_brightness(10.0, 20.0, 1.5));
        assert_eq!(star_alpha(3.0, 4.0, 0.25), star_alpha(3.0, 4.0, 0.25));
    }

    #[test]
    fn brightness_and_alpha_stay_in_range() {
        for i in 0..200 {
            let x = i as f32 * 7.3;
            let y = i as f32 * 3.1;
            let t = i as f32 * 0.05;
            let b = star_brightness(x, y, t);
            assert!((0.0..=128.0).contains(&b), "{b}");
            assert!((64..=192).contains(&star_alpha(x, y, t)));
        }
    }

    // ── draw ──────────────────────────────────────────────────────────────

    #[test]
    fn draw_generates_and_draws_every_star() {
        let mut field = Starfield::new();
        let mut canvas = RecordingCanvas::new(800, 600);
        field.draw(Some(&mut canvas), &mut rng(), Dimension::new(800, 600), 0.1, true);

        assert_eq!(field.stars().len(), STAR_COUNT);
        assert_eq!(canvas.rects.len(), STAR_COUNT);
        for (color, rect) in &canvas.rects {
            assert_eq!((color.r, color.g, color.b), (255, 255, 255));
            assert!(rect.width() >= 1 && rect.height() >= 1);
        }
    }

    #[test]
    fn stars_rescale_to_current_window() {
        let mut field = Starfield::new();
        field.stars.push(Star { x: 0.5, y: 0.25, size: 0.01 });

        let mut canvas = RecordingCanvas::new(400, 200);
        field.draw(Some(&mut canvas), &mut rng(), Dimension::new(400, 200), 0.0, true);
        assert_eq!(canvas.rects[0].1, ScreenRect::new(200, 50, 202, 52));

        let mut canvas = RecordingCanvas::new(800, 400);
        field.draw(Some(&mut canvas), &mut rng(), Dimension::new(800, 400), 0.0, true);
        assert_eq!(canvas.rects[0].1, ScreenRect::new(400, 100, 404, 104));
    }

    #[test]
    fn uneven_rescale_truncates_to_whole_pixels() {
        let mut field = Starfield::new();
        field.stars.push(Star { x: 302.0 / 800.0, y: 0.25, size: 0.0044 });

        let mut canvas = RecordingCanvas::new(1000, 400);
        field.draw(Some(&mut canvas), &mut rng(), Dimension::new(1000, 400), 0.0, true);

        let (color, rect) = canvas.rects[0];
        assert_eq!(rect, ScreenRect::new(377, 100, 378, 101));
        assert_eq!(rect.width(), rect.height());
        assert_eq!(color, Color::WHITE.with_alpha(star_alpha(377.0, 100.0, 0.0)));
    }

    #[test]
    fn tiny_stars_are_at_least_one_pixel() {
        let mut field = Starfield::new();
        field.stars.push(Star { x: 0.0, y: 0.0, size: 0.0004 });
        let mut canvas = RecordingCanvas::new(100, 100);
        field.draw(Some(&mut canvas), &mut rng(), Dimension::new(100, 100), 0.0, true);
        assert_eq!(canvas.rects[0].1, ScreenRect::new(0, 0, 1, 1));
    }

    #[test]
    fn disabled_or_missing_canvas_draws_nothing_but_advances_time() {
        let mut field = Starfield::new();
        let mut canvas = RecordingCanvas::new(100, 100);

        field.draw(Some(&mut canvas), &mut rng(), Dimension::new(100, 100), 0.5, false);
        field.draw(None, &mut rng(), Dimension::new(100, 100), 0.5, true);

        assert!(canvas.rects.is_empty());
        assert!(field.stars().is_empty());
        assert!((field.time() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn time_wraps_after_full_turn() {
        let mut field = Starfield::new();
        for _ in 0..1000 {
            field.draw(None, &mut rng(), Dimension::new(1, 1), 0.37, true);
            assert!(field.time() <= TAU);
        }
        field.time = 6.0;
        field.draw(None, &mut rng(), Dimension::new(1, 1), 1.0, true);
        assert_eq!(field.time(), 0.0);
    }
}
