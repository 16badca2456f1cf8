//! Input subsystem.
//!
//! Public API is platform-agnostic. The engine's event pump translates winit
//! window events into `InputEvent`s and feeds them to the shared
//! `EventReceiver`.

mod receiver;
mod types;

pub(crate) mod platform {
    pub(crate) mod winit;
}

pub use receiver::EventReceiver;
pub use types::{InputEvent, Key, KeyState, PointerType, TouchPhase};
