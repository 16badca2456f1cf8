use std::rc::Rc;

use crate::coords::{Dimension, ScreenRect};
use crate::paint::Color;
use crate::render::Texture;

/// Immediate 2D drawing surface.
///
/// Implemented by [`VideoDriver`](super::VideoDriver) while a scene is open.
/// Decorations and collaborators draw through this trait so they can be
/// exercised without a GPU.
pub trait Canvas2d {
    /// Size of the drawable area in pixels.
    fn screen_size(&self) -> Dimension;

    /// Queues a solid rectangle.
    fn draw_2d_rectangle(&mut self, color: Color, rect: ScreenRect);

    /// Queues a textured rectangle. `src` is in texel coordinates; `None`
    /// selects the whole texture.
    fn draw_2d_image(
        &mut self,
        texture: &Rc<Texture>,
        dest: ScreenRect,
        src: Option<ScreenRect>,
        tint: Color,
    );
}

/// Canvas that records draw calls, for tests of code drawing through
/// [`Canvas2d`].
#[cfg(test)]
pub(crate) struct RecordingCanvas {
    pub size: Dimension,
    pub rects: Vec<(Color, ScreenRect)>,
    pub images: Vec<(String, ScreenRect, Option<ScreenRect>, Color)>,
}

#[cfg(test)]
impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Dimension::new(width, height),
            rects: Vec::new(),
            images: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Canvas2d for RecordingCanvas {
    fn screen_size(&self) -> Dimension {
        self.size
    }

    fn draw_2d_rectangle(&mut self, color: Color, rect: ScreenRect) {
        self.rects.push((color, rect));
    }

    fn draw_2d_image(
        &mut self,
        texture: &Rc<Texture>,
        dest: ScreenRect,
        src: Option<ScreenRect>,
        tint: Color,
    ) {
        self.images.push((texture.name().to_string(), dest, src, tint));
    }
}
