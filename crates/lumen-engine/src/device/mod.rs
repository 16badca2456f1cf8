//! Video driver and device-side state.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue bound to the window
//! - configuring the surface and mapping per-frame surface errors
//! - batching 2D draw calls between `begin_scene` and `end_scene`
//! - holding the fog state read back by shader uniform setters

mod canvas;
mod driver;
mod driver_info;
mod fog;
mod init;
mod surface;

pub use canvas::Canvas2d;
#[cfg(test)]
pub(crate) use canvas::RecordingCanvas;
pub use driver::VideoDriver;
pub use driver_info::{supported_video_drivers, video_driver_info, DriverType, VideoDriverInfo};
pub use fog::{FogParams, FogType, BS, FOG_RANGE_ALL};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
