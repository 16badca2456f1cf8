//! Screen geometry shared by the driver, renderers and GUI.
//!
//! Canonical space:
//! - physical pixels
//! - origin top-left
//! - +X right, +Y down
//!
//! Renderers convert to NDC in shaders using a viewport uniform.

mod dimension;
mod screen_rect;
mod viewport;

pub use dimension::Dimension;
pub use screen_rect::ScreenRect;
pub use viewport::Viewport;
