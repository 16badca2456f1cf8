//! GPU rendering subsystem.
//!
//! Renderers consume the scene draw stream and issue GPU commands via wgpu.
//! Each renderer owns its GPU resources (pipelines, buffers, uploaded textures).
//!
//! Convention:
//! - CPU geometry is in physical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.

mod common;
mod ctx;
mod image;
mod rect;
mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use image::ImageRenderer;
pub use rect::RectRenderer;
pub use texture::{Texture, TextureId};
