use std::rc::Rc;

use crate::coords::ScreenRect;
use crate::paint::Color;
use crate::render::Texture;

/// Solid rectangle payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: ScreenRect,
    pub color: Color,
}

/// Textured rectangle payload.
///
/// `src` is given in texel coordinates of `texture`; it is converted to UVs by
/// the image renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCmd {
    pub texture: Rc<Texture>,
    pub dest: ScreenRect,
    pub src: ScreenRect,
    pub tint: Color,
}

/// Renderer-agnostic draw command.
///
/// Extending the stream:
/// - add a variant here
/// - add a push helper on `DrawList`
/// - add a matching renderer under `render::*`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    Image(ImageCmd),
}

impl DrawCmd {
    #[inline]
    pub fn kind(&self) -> DrawKind {
        match self {
            Self::Rect(_) => DrawKind::Rect,
            Self::Image(_) => DrawKind::Image,
        }
    }
}

/// Which renderer handles a command.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawKind {
    Rect,
    Image,
}
