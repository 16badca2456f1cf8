/// Graphics backend a video driver can run on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DriverType {
    Null,
    Vulkan,
    Metal,
    Dx12,
    OpenGl,
    WebGpu,
}

/// Human-facing description of a driver type.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VideoDriverInfo {
    /// Stable identifier, as accepted by the `video_driver` setting.
    pub name: &'static str,
    /// Display name for menus and logs.
    pub friendly_name: &'static str,
}

const NULL_INFO: VideoDriverInfo = VideoDriverInfo { name: "null", friendly_name: "Null Driver" };
const VULKAN_INFO: VideoDriverInfo = VideoDriverInfo { name: "vulkan", friendly_name: "Vulkan" };
const METAL_INFO: VideoDriverInfo = VideoDriverInfo { name: "metal", friendly_name: "Metal" };
const DX12_INFO: VideoDriverInfo = VideoDriverInfo { name: "dx12", friendly_name: "Direct3D 12" };
const OPENGL_INFO: VideoDriverInfo =
    VideoDriverInfo { name: "opengl", friendly_name: "OpenGL / OpenGL ES" };
const WEBGPU_INFO: VideoDriverInfo = VideoDriverInfo { name: "webgpu", friendly_name: "WebGPU" };

/// Driver types in order of preference (best first). `Null` is never offered.
const PREFERRED: [DriverType; 5] = [
    DriverType::Vulkan,
    DriverType::Metal,
    DriverType::Dx12,
    DriverType::OpenGl,
    DriverType::WebGpu,
];

impl DriverType {
    pub fn info(self) -> &'static VideoDriverInfo {
        match self {
            DriverType::Null => &NULL_INFO,
            DriverType::Vulkan => &VULKAN_INFO,
            DriverType::Metal => &METAL_INFO,
            DriverType::Dx12 => &DX12_INFO,
            DriverType::OpenGl => &OPENGL_INFO,
            DriverType::WebGpu => &WEBGPU_INFO,
        }
    }

    /// Parses a driver identifier (case-insensitive). Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        PREFERRED
            .iter()
            .chain(std::iter::once(&DriverType::Null))
            .copied()
            .find(|ty| ty.info().name.eq_ignore_ascii_case(name))
    }

    /// Maps the backend reported by an adapter.
    pub fn from_backend(backend: wgpu::Backend) -> Self {
        match backend {
            wgpu::Backend::Vulkan => DriverType::Vulkan,
            wgpu::Backend::Metal => DriverType::Metal,
            wgpu::Backend::Dx12 => DriverType::Dx12,
            wgpu::Backend::Gl => DriverType::OpenGl,
            wgpu::Backend::BrowserWebGpu => DriverType::WebGpu,
            _ => DriverType::Null,
        }
    }

    /// Instance backend flags selecting this driver type.
    pub fn backends(self) -> wgpu::Backends {
        match self {
            DriverType::Null => wgpu::Backends::empty(),
            DriverType::Vulkan => wgpu::Backends::VULKAN,
            DriverType::Metal => wgpu::Backends::METAL,
            DriverType::Dx12 => wgpu::Backends::DX12,
            DriverType::OpenGl => wgpu::Backends::GL,
            DriverType::WebGpu => wgpu::Backends::BROWSER_WEBGPU,
        }
    }
}

/// Returns the display information for `ty`.
pub fn video_driver_info(ty: DriverType) -> &'static VideoDriverInfo {
    ty.info()
}

/// Driver types compiled into this build, best first.
pub fn supported_video_drivers() -> Vec<DriverType> {
    supported_among(wgpu::Instance::enabled_backend_features())
}

fn supported_among(enabled: wgpu::Backends) -> Vec<DriverType> {
    PREFERRED
        .iter()
        .copied()
        .filter(|ty| enabled.contains(ty.backends()))
        .collect()
}
