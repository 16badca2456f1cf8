use super::DriverType;

/// Initialization parameters for the video driver.
///
/// Keep this structure small. Add fields only when a concrete platform or
/// backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backend to request. `None` lets wgpu pick among every compiled-in backend.
    pub driver_type: Option<DriverType>,

    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Synchronize presentation with the display refresh.
    ///
    /// When disabled, a non-blocking present mode is chosen if the surface
    /// supports one; frame pacing is then left to `FpsControl`.
    pub vsync: bool,

    /// Adapter power preference.
    pub power_preference: wgpu::PowerPreference,

    /// Desired maximum frame latency for the surface (a hint).
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            driver_type: None,
            prefer_srgb: true,
            vsync: false,
            power_preference: wgpu::PowerPreference::HighPerformance,
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Backends to enable on the wgpu instance.
    pub fn backends(&self) -> wgpu::Backends {
        match self.driver_type {
            Some(ty) => ty.backends(),
            None => wgpu::Backends::all(),
        }
    }
}
