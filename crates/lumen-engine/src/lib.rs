//! Lumen engine crate.
//!
//! A rendering engine facade over winit and wgpu: window and video driver
//! ownership, frame pacing, the main menu starfield, loading screens and
//! pluggable rendering cores for game scenes.

pub mod coords;
pub mod device;
pub mod engine;
pub mod gui;
pub mod input;
pub mod io;
pub mod logging;
pub mod menu;
pub mod paint;
pub mod pipeline;
pub mod render;
pub mod scene;
pub mod settings;
pub mod time;

pub use engine::{EngineConfig, RenderingEngine};
pub use settings::Settings;
pub use time::FpsControl;
