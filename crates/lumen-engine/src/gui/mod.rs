//! GUI environment.
//!
//! Holds static text elements and rasterizes them with `fontdue`. Rasterized
//! text is uploaded as an ordinary texture and drawn through the driver's
//! image path, tinted with the element color.

mod environment;
mod text;

pub use environment::{align_in, Align, ElementId, GuiEnvironment};
