//! Time subsystem.
//!
//! Provides frame pacing without coupling to the window runtime.
//! Intended usage:
//! - one `FpsControl` per render loop
//! - call `reset()` when the loop starts, then `limit()` once per presented frame

mod clock;
mod fps_control;

pub use clock::{Clock, SystemClock};
pub use fps_control::FpsControl;
