//! Main menu decorations.

mod decor;
mod starfield;

pub use decor::MenuDecor;
pub use starfield::{star_alpha, star_brightness, Star, Starfield, STAR_COUNT};
