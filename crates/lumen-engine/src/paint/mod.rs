//! Color model shared between the driver, renderers and menu decoration.
//!
//! Device colors are 8-bit straight-alpha ARGB in sRGB space. Renderers consume
//! linear premultiplied `f32` values produced by [`Color::to_linear_premul`].

mod color;

pub use color::Color;
