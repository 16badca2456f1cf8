use super::Dimension;

/// Viewport size used as the basis for pixel → NDC conversion in shaders.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

impl From<Dimension> for Viewport {
    #[inline]
    fn from(d: Dimension) -> Self {
        Self::new(d.width as f32, d.height as f32)
    }
}
