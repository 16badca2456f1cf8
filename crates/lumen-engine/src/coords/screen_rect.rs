use super::Dimension;

/// Axis-aligned integer rectangle given by its two corners.
///
/// `(x0, y0)` is the upper-left corner (inclusive), `(x1, y1)` the lower-right
/// corner (exclusive).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct ScreenRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl ScreenRect {
    #[inline]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[inline]
    pub const fn from_pos_size(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    /// Rectangle covering a whole screen of the given size.
    #[inline]
    pub fn of_size(size: Dimension) -> Self {
        Self::new(0, 0, size.width as i32, size.height as i32)
    }

    /// Rectangle of `size` centered on `(cx, cy)`.
    #[inline]
    pub fn centered(cx: i32, cy: i32, size: Dimension) -> Self {
        let w = size.width as i32;
        let h = size.height as i32;
        Self::new(cx - w / 2, cy - h / 2, cx + w - w / 2, cy + h - h / 2)
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.x1 - self.x0
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.y1 - self.y0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Swaps corners so that `x0 <= x1` and `y0 <= y1`.
    #[inline]
    pub fn normalized(self) -> Self {
        Self::new(
            self.x0.min(self.x1),
            self.y0.min(self.y1),
            self.x0.max(self.x1),
            self.y0.max(self.y1),
        )
    }

    #[inline]
    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x0 + dx, self.y0 + dy, self.x1 + dx, self.y1 + dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── size ──────────────────────────────────────────────────────────────

    #[test]
    fn from_pos_size_sets_far_corner() {
        let r = ScreenRect::from_pos_size(10, 20, 30, 40);
        assert_eq!(r, ScreenRect::new(10, 20, 40, 60));
        assert_eq!(r.width(), 30);
        assert_eq!(r.height(), 40);
    }

    #[test]
    fn is_empty_for_degenerate_rects() {
        assert!(ScreenRect::new(5, 5, 5, 10).is_empty());
        assert!(ScreenRect::new(5, 5, 10, 5).is_empty());
        assert!(ScreenRect::new(10, 10, 5, 5).is_empty());
        assert!(!ScreenRect::new(0, 0, 1, 1).is_empty());
    }

    // ── placement ─────────────────────────────────────────────────────────

    #[test]
    fn centered_even_size() {
        let r = ScreenRect::centered(100, 50, Dimension::new(40, 20));
        assert_eq!(r, ScreenRect::new(80, 40, 120, 60));
    }

    #[test]
    fn centered_odd_size_keeps_exact_dimensions() {
        let r = ScreenRect::centered(10, 10, Dimension::new(5, 3));
        assert_eq!(r.width(), 5);
        assert_eq!(r.height(), 3);
    }

    #[test]
    fn normalized_swaps_inverted_corners() {
        let r = ScreenRect::new(10, 20, 0, 5).normalized();
        assert_eq!(r, ScreenRect::new(0, 5, 10, 20));
    }

    #[test]
    fn translated_moves_both_corners() {
        let r = ScreenRect::new(0, 0, 4, 4).translated(3, -1);
        assert_eq!(r, ScreenRect::new(3, -1, 7, 3));
    }

    #[test]
    fn of_size_covers_screen() {
        let r = ScreenRect::of_size(Dimension::new(800, 600));
        assert_eq!(r, ScreenRect::new(0, 0, 800, 600));
    }
}
