use std::rc::Rc;

use anyhow::Result;

use crate::coords::{Dimension, ScreenRect};
use crate::device::Canvas2d;
use crate::paint::Color;
use crate::render::Texture;

use super::text;

/// Handle to an element added to a [`GuiEnvironment`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ElementId(u32);

/// Alignment of text inside its element rectangle, per axis.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

struct StaticText {
    id: ElementId,
    text: String,
    rect: ScreenRect,
    h_align: Align,
    v_align: Align,
    color: Color,
    rendered: Option<Rc<Texture>>,
}

/// Minimal GUI environment: a flat list of static text elements drawn in
/// insertion order.
pub struct GuiEnvironment {
    font: Option<fontdue::Font>,
    font_px: f32,
    elements: Vec<StaticText>,
    next_id: u32,
    warned_no_font: bool,
}

impl Default for GuiEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl GuiEnvironment {
    pub const DEFAULT_FONT_PX: f32 = 18.0;

    pub fn new() -> Self {
        Self {
            font: None,
            font_px: Self::DEFAULT_FONT_PX,
            elements: Vec::new(),
            next_id: 1,
            warned_no_font: false,
        }
    }

    /// Parses and installs a TrueType/OpenType font for all text elements.
    pub fn set_font(&mut self, bytes: &[u8]) -> Result<()> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| anyhow::anyhow!("font load error: {e}"))?;
        self.font = Some(font);
        self.invalidate();
        Ok(())
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Sets the text pixel size. Non-finite or non-positive sizes are ignored.
    pub fn set_font_px(&mut self, px: f32) {
        if !(px.is_finite() && px > 0.0) || px == self.font_px {
            return;
        }
        self.font_px = px;
        self.invalidate();
    }

    pub fn font_px(&self) -> f32 {
        self.font_px
    }

    /// Extent of `text` rendered with the current font.
    pub fn measure(&self, text: &str) -> Dimension {
        match &self.font {
            Some(font) => text::measure(font, text, self.font_px),
            None => Dimension::new(0, text::line_height(self.font_px)),
        }
    }

    pub fn add_static_text(
        &mut self,
        text: impl Into<String>,
        rect: ScreenRect,
        h_align: Align,
        v_align: Align,
    ) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.push(StaticText {
            id,
            text: text.into(),
            rect: rect.normalized(),
            h_align,
            v_align,
            color: Color::WHITE,
            rendered: None,
        });
        id
    }

    pub fn set_text_color(&mut self, id: ElementId, color: Color) {
        if let Some(el) = self.elements.iter_mut().find(|e| e.id == id) {
            el.color = color;
        }
    }

    /// Moves an element. Its rasterized text is kept. Returns false if the
    /// element is gone.
    pub fn set_rect(&mut self, id: ElementId, rect: ScreenRect) -> bool {
        match self.elements.iter_mut().find(|e| e.id == id) {
            Some(el) => {
                el.rect = rect.normalized();
                true
            }
            None => false,
        }
    }

    pub fn rect(&self, id: ElementId) -> Option<ScreenRect> {
        self.elements.iter().find(|e| e.id == id).map(|e| e.rect)
    }

    /// Removes an element. Returns false if it was already gone.
    pub fn remove(&mut self, id: ElementId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| e.id != id);
        self.elements.len() != before
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Draws every element. Text is rasterized on first draw and reused.
    pub fn draw_all(&mut self, canvas: &mut dyn Canvas2d) {
        let Some(font) = self.font.as_ref() else {
            if !self.elements.is_empty() && !self.warned_no_font {
                log::warn!("gui: no font installed; text elements are not drawn");
                self.warned_no_font = true;
            }
            return;
        };

        for el in &mut self.elements {
            if el.rendered.is_none() {
                el.rendered = text::rasterize(font, &el.text, self.font_px).and_then(|(size, pixels)| {
                    Texture::from_rgba8(format!("gui text #{}", el.id.0), size.width, size.height, pixels)
                        .map(Rc::new)
                        .map_err(|e| log::warn!("gui: {e:#}"))
                        .ok()
                });
            }
            let Some(texture) = &el.rendered else { continue };
            let dest = align_in(el.rect, texture.size(), el.h_align, el.v_align);
            canvas.draw_2d_image(texture, dest, None, el.color);
        }
    }

    fn invalidate(&mut self) {
        for el in &mut self.elements {
            el.rendered = None;
        }
    }
}

/// Places a `size` box inside `rect` according to the alignments.
pub fn align_in(rect: ScreenRect, size: Dimension, h: Align, v: Align) -> ScreenRect {
    let (w, hgt) = (size.width as i32, size.height as i32);
    let x = match h {
        Align::Start => rect.x0,
        Align::Center => rect.x0 + (rect.width() - w) / 2,
        Align::End => rect.x1 - w,
    };
    let y = match v {
        Align::Start => rect.y0,
        Align::Center => rect.y0 + (rect.height() - hgt) / 2,
        Align::End => rect.y1 - hgt,
    };
    ScreenRect::from_pos_size(x, y, w, hgt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RecordingCanvas;

    // ── alignment ─────────────────────────────────────────────────────────

    #[test]
    fn center_alignment() {
        let r = align_in(
            ScreenRect::new(0, 0, 100, 50),
            Dimension::new(20, 10),
            Align::Center,
            Align::Center,
        );
        assert_eq!(r, ScreenRect::new(40, 20, 60, 30));
    }

    #[test]
    fn start_and_end_alignment() {
        let rect = ScreenRect::new(10, 10, 110, 60);
        let size = Dimension::new(20, 10);
        assert_eq!(align_in(rect, size, Align::Start, Align::Start), ScreenRect::new(10, 10, 30, 20));
        assert_eq!(align_in(rect, size, Align::End, Align::End), ScreenRect::new(90, 50, 110, 60));
    }

    #[test]
    fn oversized_content_overflows_symmetrically() {
        let r = align_in(
            ScreenRect::new(0, 0, 10, 10),
            Dimension::new(30, 10),
            Align::Center,
            Align::Start,
        );
        assert_eq!(r, ScreenRect::new(-10, 0, 20, 10));
    }

    // ── elements ──────────────────────────────────────────────────────────

    #[test]
    fn add_and_remove_elements() {
        let mut gui = GuiEnvironment::new();
        let a = gui.add_static_text("Loading", ScreenRect::new(0, 0, 10, 10), Align::Center, Align::Center);
        let b = gui.add_static_text("Media", ScreenRect::new(0, 0, 10, 10), Align::Start, Align::Start);
        assert_ne!(a, b);
        assert_eq!(gui.element_count(), 2);

        assert!(gui.remove(a));
        assert!(!gui.remove(a));
        assert_eq!(gui.element_count(), 1);
    }

    #[test]
    fn moving_an_element_keeps_its_text() {
        let mut gui = GuiEnvironment::new();
        let id = gui.add_static_text("Press Enter", ScreenRect::new(0, 0, 800, 568), Align::Center, Align::End);
        let texture = Rc::new(Texture::from_rgba8("hint", 2, 1, vec![255; 8]).unwrap());
        gui.elements[0].rendered = Some(Rc::clone(&texture));

        assert!(gui.set_rect(id, ScreenRect::new(1024, 736, 0, 0)));
        assert_eq!(gui.rect(id), Some(ScreenRect::new(0, 0, 1024, 736)));
        assert!(gui.elements[0].rendered.as_ref().is_some_and(|t| Rc::ptr_eq(t, &texture)));

        gui.remove(id);
        assert!(!gui.set_rect(id, ScreenRect::new(0, 0, 1, 1)));
        assert_eq!(gui.rect(id), None);
    }

    #[test]
    fn draw_without_font_is_a_no_op() {
        let mut gui = GuiEnvironment::new();
        gui.add_static_text("Loading", ScreenRect::new(0, 0, 10, 10), Align::Center, Align::Center);
        let mut canvas = RecordingCanvas::new(100, 100);
        gui.draw_all(&mut canvas);
        gui.draw_all(&mut canvas);
        assert!(canvas.images.is_empty());
    }

    #[test]
    fn invalid_font_bytes_are_rejected() {
        let mut gui = GuiEnvironment::new();
        assert!(gui.set_font(b"definitely not a font").is_err());
        assert!(!gui.has_font());
    }

    #[test]
    fn measure_without_font_reports_line_height() {
        let mut gui = GuiEnvironment::new();
        gui.set_font_px(20.0);
        assert_eq!(gui.measure("abc"), Dimension::new(0, 24));
        gui.set_font_px(-1.0);
        assert_eq!(gui.font_px(), 20.0);
    }
}
