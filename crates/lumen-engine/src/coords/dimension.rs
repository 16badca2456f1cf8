use winit::dpi::PhysicalSize;

/// Width/height pair in pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

impl Dimension {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<PhysicalSize<u32>> for Dimension {
    #[inline]
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

impl From<Dimension> for PhysicalSize<u32> {
    #[inline]
    fn from(d: Dimension) -> Self {
        PhysicalSize::new(d.width, d.height)
    }
}
