//! Asset access: search-path file lookup and named textures.

mod file_system;
mod texture_source;

pub use file_system::FileSystem;
pub use texture_source::{FileTextureSource, FileTextures, TextureSource};
