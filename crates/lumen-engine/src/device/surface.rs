use winit::dpi::PhysicalSize;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; the frame was dropped.
    SkipFrame,
    /// Unrecoverable (commonly OOM); the application should shut down.
    Fatal,
}

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = *caps.formats.first()?;

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| caps.formats.contains(f)) {
            return Some(f);
        }
    }

    Some(first)
}

pub(crate) fn choose_alpha_mode(caps: &wgpu::SurfaceCapabilities) -> wgpu::CompositeAlphaMode {
    [wgpu::CompositeAlphaMode::Opaque, wgpu::CompositeAlphaMode::Auto]
        .into_iter()
        .find(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// FIFO when vsync is requested (always supported); otherwise the first
/// non-blocking mode the surface offers, falling back to FIFO.
pub(crate) fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    vsync: bool,
) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }

    [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
        .into_iter()
        .find(|m| caps.present_modes.contains(m))
        .unwrap_or(wgpu::PresentMode::Fifo)
}

/// Applies a new drawable size. A zero-sized surface cannot be configured, so
/// only the stored size is updated and configuration waits for the next resize.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return;
    }

    config.width = new_size.width;
    config.height = new_size.height;
    surface.configure(device, config);
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(
        formats: Vec<wgpu::TextureFormat>,
        present_modes: Vec<wgpu::PresentMode>,
        alpha_modes: Vec<wgpu::CompositeAlphaMode>,
    ) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            present_modes,
            alpha_modes,
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn format_prefers_srgb_when_requested() {
        let c = caps(
            vec![wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Bgra8UnormSrgb],
            vec![],
            vec![],
        );
        assert_eq!(choose_surface_format(&c, true), Some(wgpu::TextureFormat::Bgra8UnormSrgb));
        assert_eq!(choose_surface_format(&c, false), Some(wgpu::TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn format_none_without_formats() {
        assert_eq!(choose_surface_format(&caps(vec![], vec![], vec![]), true), None);
    }

    // ── present mode ──────────────────────────────────────────────────────

    #[test]
    fn vsync_always_uses_fifo() {
        let c = caps(vec![], vec![wgpu::PresentMode::Mailbox], vec![]);
        assert_eq!(choose_present_mode(&c, true), wgpu::PresentMode::Fifo);
    }

    #[test]
    fn no_vsync_picks_non_blocking_mode() {
        let c = caps(
            vec![],
            vec![wgpu::PresentMode::Fifo, wgpu::PresentMode::Immediate],
            vec![],
        );
        assert_eq!(choose_present_mode(&c, false), wgpu::PresentMode::Immediate);
    }

    #[test]
    fn no_vsync_falls_back_to_fifo() {
        let c = caps(vec![], vec![wgpu::PresentMode::Fifo], vec![]);
        assert_eq!(choose_present_mode(&c, false), wgpu::PresentMode::Fifo);
    }

    // ── alpha mode ────────────────────────────────────────────────────────

    #[test]
    fn alpha_prefers_opaque() {
        let c = caps(
            vec![],
            vec![],
            vec![wgpu::CompositeAlphaMode::PreMultiplied, wgpu::CompositeAlphaMode::Opaque],
        );
        assert_eq!(choose_alpha_mode(&c), wgpu::CompositeAlphaMode::Opaque);
    }

    #[test]
    fn alpha_falls_back_to_first_supported() {
        let c = caps(vec![], vec![], vec![wgpu::CompositeAlphaMode::PostMultiplied]);
        assert_eq!(choose_alpha_mode(&c), wgpu::CompositeAlphaMode::PostMultiplied);
    }
}
