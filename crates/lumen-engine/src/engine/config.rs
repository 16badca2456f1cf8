use winit::dpi::PhysicalSize;
use winit::window::{Fullscreen, Window, WindowAttributes};

use crate::device::{DriverType, GpuInit};
use crate::settings::Settings;

/// Engine construction parameters that do not live in [`Settings`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Window caption set by `setup_top_level_window`.
    pub title: String,

    /// Window icon image, resolved through the engine file system.
    pub icon: String,

    /// Base driver parameters. `video_driver` and `vsync` settings override
    /// the matching fields.
    pub gpu: GpuInit,

    /// Event pump iterations to wait for the platform to hand out a window.
    pub max_startup_pumps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Lumen".to_string(),
            icon: "lumen.png".to_string(),
            gpu: GpuInit::default(),
            max_startup_pumps: 200,
        }
    }
}

/// Window attributes derived from `screen_w`, `screen_h`, `fullscreen` and
/// `window_maximized`.
pub(super) fn window_attributes(config: &EngineConfig, settings: &Settings) -> WindowAttributes {
    let size = PhysicalSize::new(
        settings.get_u32("screen_w").max(1),
        settings.get_u32("screen_h").max(1),
    );
    let fullscreen = settings
        .get_bool("fullscreen")
        .then_some(Fullscreen::Borderless(None));

    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(size)
        .with_resizable(true)
        .with_maximized(settings.get_bool("window_maximized"))
        .with_fullscreen(fullscreen)
}

/// Applies the `video_driver` and `vsync` settings on top of `base`.
pub(super) fn gpu_init_from_settings(base: &GpuInit, settings: &Settings) -> GpuInit {
    let mut init = base.clone();
    init.vsync = settings.get_bool("vsync");

    let name = settings.get("video_driver").unwrap_or_default();
    if name.trim().is_empty() {
        return init;
    }
    match DriverType::from_name(&name) {
        Some(DriverType::Null) => {
            log::warn!("video_driver 'null' cannot present to a window; using the default driver");
        }
        Some(ty) => init.driver_type = Some(ty),
        None => {
            log::warn!("unknown video_driver '{name}'; using the default driver");
        }
    }
    init
}
