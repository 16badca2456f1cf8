//! Loading screen progress bar.

use std::rc::Rc;

use crate::coords::{Dimension, ScreenRect};
use crate::device::Canvas2d;
use crate::paint::Color;
use crate::render::Texture;

pub const PROGRESS_BAR: &str = "progress_bar.png";
pub const PROGRESS_BAR_BG: &str = "progress_bar_bg.png";

/// Size assumed for the bar when its images are unavailable.
const FALLBACK_IMAGE: Dimension = Dimension::new(200, 24);
const FALLBACK_BG: Color = Color::new(255, 40, 40, 40);
const FALLBACK_FG: Color = Color::new(255, 220, 220, 220);

/// Filled part of the progress bar, in percent.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ProgressSpan {
    pub min: i32,
    pub max: i32,
}

impl ProgressSpan {
    /// Span for a determinate `percent`, or, with `indef_pos`, advances the
    /// indefinite animation by `dtime` and returns the sliding window.
    ///
    /// The indefinite position runs over `0..140`: a 40 percent wide window
    /// enters from the left, crosses the bar and leaves on the right.
    pub fn advance(percent: i32, indef_pos: Option<&mut f32>, dtime: f32) -> Self {
        match indef_pos {
            Some(pos) => {
                *pos = (*pos + dtime * 50.0) % 140.0;
                let p = *pos as i32;
                Self {
                    min: (p - 40).max(0),
                    max: p.min(100),
                }
            }
            None => Self { min: 0, max: percent },
        }
    }

    pub fn is_drawable(self) -> bool {
        self.min >= 0 && self.max <= 100
    }
}

/// Destination and source rectangles of the two bar layers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ProgressBarLayout {
    pub bg_dest: ScreenRect,
    pub bg_src: ScreenRect,
    pub fg_dest: ScreenRect,
    pub fg_src: ScreenRect,
}

impl ProgressBarLayout {
    /// Centers a bar scaled from `image` on `screen`. The image is clamped to
    /// 200..=600 by 24..=72 pixels before scaling by `density`.
    pub fn new(screen: Dimension, image: Dimension, density: f32, span: ProgressSpan) -> Self {
        let img_w = (image.width.clamp(200, 600) as f32 * density) as i32;
        let img_h = (image.height.clamp(24, 72) as f32 * density) as i32;
        let x = (screen.width as i32 - img_w) / 2;
        let y = (screen.height as i32 - img_h) / 2;

        let (iw, ih) = (image.width as i32, image.height as i32);
        Self {
            bg_dest: ScreenRect::from_pos_size(x, y, img_w, img_h),
            bg_src: ScreenRect::new(0, 0, iw, ih),
            fg_dest: ScreenRect::new(
                x + span.min * img_w / 100,
                y,
                x + span.max * img_w / 100,
                y + img_h,
            ),
            fg_src: ScreenRect::new(span.min * iw / 100, 0, span.max * iw / 100, ih),
        }
    }
}

/// Images used for the bar. Both must be present for the textured look;
/// otherwise the bar is drawn in solid fallback colors.
pub struct BarTextures {
    pub fg: Option<Rc<Texture>>,
    pub bg: Option<Rc<Texture>>,
}

pub fn draw_progress_bar(
    canvas: &mut dyn Canvas2d,
    screen: Dimension,
    textures: &BarTextures,
    density: f32,
    span: ProgressSpan,
) {
    match (&textures.fg, &textures.bg) {
        (Some(fg), Some(bg)) => {
            let layout = ProgressBarLayout::new(screen, bg.size(), density, span);
            canvas.draw_2d_image(bg, layout.bg_dest, Some(layout.bg_src), Color::WHITE);
            canvas.draw_2d_image(fg, layout.fg_dest, Some(layout.fg_src), Color::WHITE);
        }
        _ => {
            let layout = ProgressBarLayout::new(screen, FALLBACK_IMAGE, density, span);
            canvas.draw_2d_rectangle(FALLBACK_BG, layout.bg_dest);
            canvas.draw_2d_rectangle(FALLBACK_FG, layout.fg_dest);
        }
    }
}
