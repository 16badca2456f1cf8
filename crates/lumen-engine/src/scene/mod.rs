//! Scene types.
//!
//! Responsibilities:
//! - store the renderer-agnostic 2D draw stream recorded between
//!   `begin_scene` and `end_scene`
//! - own the mesh cache of the scene manager

mod cmd;
mod list;
mod manager;

pub use cmd::{DrawCmd, DrawKind, ImageCmd, RectCmd};
pub use list::{DrawList, DrawRun};
pub use manager::{Mesh, SceneManager};
