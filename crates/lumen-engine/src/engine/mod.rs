//! The rendering engine facade.
//!
//! [`RenderingEngine`] owns the window, the video driver and the engine
//! subsystems (scene manager, GUI environment, file system, menu decor) and
//! exposes the frame-level operations a client drives: pumping events,
//! drawing menu frames, load screens and game scenes.

mod autosave;
mod config;
mod load_screen;
mod pump;
mod rendering_engine;

pub use autosave::{AutosaveUpdate, WindowState};
pub use config::EngineConfig;
pub use load_screen::{
    draw_progress_bar, BarTextures, ProgressBarLayout, ProgressSpan, PROGRESS_BAR, PROGRESS_BAR_BG,
};
pub use rendering_engine::RenderingEngine;
