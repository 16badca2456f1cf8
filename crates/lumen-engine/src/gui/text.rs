use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::coords::Dimension;

/// Lays out `text` on a single line at `px` and returns the pixel extent.
pub(super) fn measure(font: &fontdue::Font, text: &str, px: f32) -> Dimension {
    let layout = layout_line(font, text, px);
    let glyphs = layout.glyphs();
    if glyphs.is_empty() {
        return Dimension::new(0, line_height(px));
    }

    let w = glyphs
        .iter()
        .map(|g| {
            let m = font.metrics_indexed(g.key.glyph_index, px);
            (g.x - m.xmin as f32 + m.advance_width).max(0.0)
        })
        .fold(0.0f32, f32::max);
    let h = glyphs
        .iter()
        .map(|g| g.y + g.height as f32)
        .fold(layout.height(), f32::max);

    Dimension::new(w.ceil() as u32, h.ceil() as u32)
}

/// Rasterizes `text` into straight-alpha RGBA8: white pixels whose alpha is
/// the glyph coverage. Returns `None` for text without visible glyphs.
pub(super) fn rasterize(font: &fontdue::Font, text: &str, px: f32) -> Option<(Dimension, Vec<u8>)> {
    let size = measure(font, text, px);
    if size.width == 0 || size.height == 0 {
        return None;
    }

    let layout = layout_line(font, text, px);
    let (w, h) = (size.width as usize, size.height as usize);
    // White everywhere keeps bilinear filtering from darkening glyph edges.
    let mut pixels = [255u8, 255, 255, 0].repeat(w * h);

    let mut any = false;
    for g in layout.glyphs() {
        if g.width == 0 || g.height == 0 {
            continue;
        }
        let (metrics, coverage) = font.rasterize_config(g.key);
        let gx = g.x.round() as i64;
        let gy = g.y.round() as i64;

        for row in 0..metrics.height {
            let py = gy + row as i64;
            if py < 0 || py >= h as i64 {
                continue;
            }
            for col in 0..metrics.width {
                let px_x = gx + col as i64;
                if px_x < 0 || px_x >= w as i64 {
                    continue;
                }
                let a = coverage[row * metrics.width + col];
                let i = (py as usize * w + px_x as usize) * 4 + 3;
                pixels[i] = pixels[i].max(a);
                any |= a > 0;
            }
        }
    }

    any.then_some((size, pixels))
}

fn layout_line(font: &fontdue::Font, text: &str, px: f32) -> Layout<()> {
    let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
    layout.reset(&LayoutSettings::default());
    layout.append(&[font], &TextStyle::new(text, px, 0));
    layout
}

/// Line height used when no glyphs are available.
pub(super) fn line_height(px: f32) -> u32 {
    (px * 1.2).ceil() as u32
}
