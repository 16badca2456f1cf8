use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::{Dimension, ScreenRect, Viewport};
use crate::paint::Color;
use crate::render::{ImageRenderer, RectRenderer, RenderCtx, RenderTarget, Texture};
use crate::scene::{DrawKind, DrawList};

use super::surface::{self, SurfaceErrorAction};
use super::{Canvas2d, DriverType, FogParams, GpuInit};

/// Video driver: owns the wgpu core objects bound to the device window and
/// batches 2D draw calls between [`begin_scene`](Self::begin_scene) and
/// [`end_scene`](Self::end_scene).
///
/// The surface is created from a shared window handle, so the driver may not
/// outlive the window in practice but never dangles either.
pub struct VideoDriver {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    adapter_info: wgpu::AdapterInfo,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,

    fog: FogParams,

    in_scene: bool,
    clear_color: Option<Color>,
    batch: DrawList,
    rects: RectRenderer,
    images: ImageRenderer,
}

impl VideoDriver {
    /// Creates a driver bound to `window`.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; callers block on
    /// it with `pollster`.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lumen-engine device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, init.prefer_srgb)
            .context("no supported surface formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: surface::choose_present_mode(&caps, init.vsync),
            alpha_mode: surface::choose_alpha_mode(&caps),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        let adapter_info = adapter.get_info();
        log::info!(
            "video driver: {} on {} ({:?}, present mode {:?})",
            DriverType::from_backend(adapter_info.backend).info().friendly_name,
            adapter_info.name,
            format,
            config.present_mode,
        );

        Ok(Self {
            window,
            surface,
            adapter_info,
            device,
            queue,
            config,
            size,
            fog: FogParams::default(),
            in_scene: false,
            clear_color: None,
            batch: DrawList::new(),
            rects: RectRenderer::new(),
            images: ImageRenderer::new(),
        })
    }

    pub fn driver_type(&self) -> DriverType {
        DriverType::from_backend(self.adapter_info.backend)
    }

    /// Adapter name as reported by the backend.
    pub fn adapter_name(&self) -> &str {
        &self.adapter_info.name
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reconfigures the surface after a window resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
    }

    pub fn fog(&self) -> FogParams {
        self.fog
    }

    pub fn set_fog(&mut self, fog: FogParams) {
        self.fog = fog;
    }

    #[inline]
    pub fn in_scene(&self) -> bool {
        self.in_scene
    }

    /// Opens a scene. With `clear` set, the frame starts from that color;
    /// otherwise the previous surface contents are undefined.
    ///
    /// Beginning a scene while one is open discards the pending draw calls.
    pub fn begin_scene(&mut self, clear: Option<Color>) {
        if self.in_scene {
            log::warn!("begin_scene called twice; dropping {} queued draw calls", self.batch.len());
        }
        self.batch.clear();
        self.clear_color = clear;
        self.in_scene = true;
    }

    /// Records and presents the queued scene.
    ///
    /// Draw calls are painted in the order they were made, so each call
    /// covers the ones before it.
    pub fn end_scene(&mut self) -> std::result::Result<(), SurfaceErrorAction> {
        if !self.in_scene {
            log::debug!("end_scene without begin_scene; ignored");
            return Ok(());
        }
        self.in_scene = false;

        if self.size.width == 0 || self.size.height == 0 {
            // Minimized: nothing to present.
            self.batch.clear();
            return Ok(());
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(err) => {
                self.batch.clear();
                let action = surface::map_surface_error(
                    &self.surface,
                    &self.device,
                    &self.config,
                    self.size,
                    err,
                );
                return Err(action);
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen frame encoder"),
            });

        let ctx = RenderCtx::new(
            &self.device,
            &self.queue,
            self.config.format,
            Viewport::from(Dimension::from(self.size)),
        );

        self.rects.prepare(&ctx, &self.batch);
        self.images.prepare(&ctx, &self.batch);

        // RenderTarget borrows the encoder; dropped before finish().
        {
            let mut target = RenderTarget::new(&mut encoder, &view);
            if let Some(clear) = self.clear_color {
                target.clear(clear);
            }
            for run in self.batch.runs() {
                match run.kind {
                    DrawKind::Rect => self.rects.render_run(&mut target, run.first, run.count),
                    DrawKind::Image => self.images.render_run(&mut target, run.first, run.count),
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        surface_texture.present();

        self.batch.clear();
        Ok(())
    }
}

impl Canvas2d for VideoDriver {
    fn screen_size(&self) -> Dimension {
        Dimension::from(self.size)
    }

    fn draw_2d_rectangle(&mut self, color: Color, rect: ScreenRect) {
        if !self.in_scene {
            log::debug!("draw_2d_rectangle outside of a scene; ignored");
            return;
        }
        self.batch.push_rect(rect, color);
    }

    fn draw_2d_image(
        &mut self,
        texture: &Rc<Texture>,
        dest: ScreenRect,
        src: Option<ScreenRect>,
        tint: Color,
    ) {
        if !self.in_scene {
            log::debug!("draw_2d_image outside of a scene; ignored");
            return;
        }
        let src = src.unwrap_or_else(|| ScreenRect::of_size(texture.size()));
        self.batch.push_image(Rc::clone(texture), dest, src, tint);
    }
}
