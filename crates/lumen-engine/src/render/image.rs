use std::collections::HashMap;
use std::rc::{Rc, Weak};

use bytemuck::{Pod, Zeroable};

use crate::render::{RenderCtx, RenderTarget, Texture, TextureId};
use crate::scene::{DrawList, ImageCmd};

use super::common::{
    create_quad_pipeline, ensure_instance_buffer, instance_range, QuadBuffers, ViewportBinding,
    QUAD_INDEX_COUNT,
};

/// GPU copy of a [`Texture`]. Lives as long as the CPU texture does.
struct GpuTexture {
    source: Weak<Texture>,
    bind_group: wgpu::BindGroup,
    _texture: wgpu::Texture,
}

/// Textured rectangle renderer.
///
/// Textures are uploaded on first use and cached by [`TextureId`]. A cached
/// upload is released once every `Rc<Texture>` handle to its source is gone.
#[derive(Default)]
pub struct ImageRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    viewport: Option<ViewportBinding>,
    texture_layout: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,
    quad: Option<QuadBuffers>,

    textures: HashMap<TextureId, GpuTexture>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
    instances: Vec<ImageInstance>,
    instance_textures: Vec<TextureId>,
}

impl ImageRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of textures currently resident on the GPU.
    pub fn resident_textures(&self) -> usize {
        self.textures.len()
    }

    /// Uploads missing textures and every image instance of `draw_list`, in
    /// recording order. Call once per frame before [`render_run`](Self::render_run).
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>, draw_list: &DrawList) {
        self.release_orphans();

        self.instances.clear();
        self.instance_textures.clear();
        let cmds: Vec<&ImageCmd> = draw_list.images().collect();
        if cmds.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx, "lumen image quad"));
        }
        for cmd in &cmds {
            self.ensure_uploaded(ctx, &cmd.texture);
        }

        self.instances.extend(cmds.iter().map(|c| ImageInstance::from_cmd(c)));
        self.instance_textures.extend(cmds.iter().map(|c| c.texture.id()));
        ensure_instance_buffer(
            ctx,
            "lumen image instance vbo",
            &mut self.instance_vbo,
            &mut self.instance_capacity,
            self.instances.len(),
            std::mem::size_of::<ImageInstance>(),
        );

        if let (Some(viewport), Some(instance_vbo)) = (self.viewport.as_ref(), self.instance_vbo.as_ref()) {
            viewport.write(ctx);
            ctx.queue
                .write_buffer(instance_vbo, 0, bytemuck::cast_slice(&self.instances));
        }
    }

    /// Draws prepared images `first..first + count`, one call per image.
    pub fn render_run(&self, target: &mut RenderTarget<'_>, first: usize, count: usize) {
        let Some(range) = instance_range(first, count, self.instances.len()) else {
            return;
        };
        let (Some(pipeline), Some(viewport), Some(quad), Some(instance_vbo)) = (
            self.pipeline.as_ref(),
            self.viewport.as_ref(),
            self.quad.as_ref(),
            self.instance_vbo.as_ref(),
        ) else {
            return;
        };

        let mut rpass = target.load_pass("lumen image pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &viewport.bind_group, &[]);
        rpass.set_vertex_buffer(0, quad.vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad.ibo.slice(..), wgpu::IndexFormat::Uint16);

        for i in range {
            let Some(gpu) = self.textures.get(&self.instance_textures[i as usize]) else { continue };
            rpass.set_bind_group(1, &gpu.bind_group, &[]);
            rpass.draw_indexed(0..QUAD_INDEX_COUNT, 0, i..i + 1);
        }
    }

    fn release_orphans(&mut self) {
        let before = self.textures.len();
        self.textures.retain(|_, gpu| gpu.source.strong_count() > 0);
        let released = before - self.textures.len();
        if released > 0 {
            log::trace!("ImageRenderer: released {released} textures");
        }
    }

    fn ensure_uploaded(&mut self, ctx: &RenderCtx<'_>, texture: &Rc<Texture>) {
        if self.textures.contains_key(&texture.id()) {
            return;
        }
        let (Some(layout), Some(sampler)) = (self.texture_layout.as_ref(), self.sampler.as_ref()) else {
            return;
        };

        let size = texture.size();
        let extent = wgpu::Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        };

        let gpu_texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(texture.name()),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &gpu_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            texture.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.width),
                rows_per_image: Some(size.height),
            },
            extent,
        );

        let view = gpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen image texture bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        log::trace!("ImageRenderer: uploaded '{}' ({}x{})", texture.name(), size.width, size.height);
        self.textures.insert(
            texture.id(),
            GpuTexture {
                source: Rc::downgrade(texture),
                bind_group,
                _texture: gpu_texture,
            },
        );
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let viewport = ViewportBinding::new(ctx, "lumen image viewport");
        let texture_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("lumen image texture bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lumen image sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let pipeline = create_quad_pipeline(
            ctx,
            "lumen image pipeline",
            include_str!("shaders/image.wgsl"),
            &[&viewport.layout, &texture_layout],
            ImageInstance::layout(),
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.viewport = Some(viewport);
        self.texture_layout = Some(texture_layout);
        self.sampler = Some(sampler);
        // Bind groups reference the old layout.
        self.textures.clear();
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ImageInstance {
    origin: [f32; 2],
    size: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    tint: [f32; 4],
}

impl ImageInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4  // tint
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ImageInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    fn from_cmd(cmd: &ImageCmd) -> Self {
        let size = cmd.texture.size();
        let tw = size.width.max(1) as f32;
        let th = size.height.max(1) as f32;
        let d = cmd.dest;
        let s = cmd.src;

        Self {
            origin: [d.x0 as f32, d.y0 as f32],
            size: [d.width() as f32, d.height() as f32],
            uv_min: [s.x0 as f32 / tw, s.y0 as f32 / th],
            uv_max: [s.x1 as f32 / tw, s.y1 as f32 / th],
            tint: cmd.tint.to_linear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::ScreenRect;
    use crate::paint::Color;

    #[test]
    fn src_rect_maps_to_uvs() {
        let texture = Rc::new(Texture::from_rgba8("bar", 200, 24, vec![0; 200 * 24 * 4]).unwrap());
        let cmd = ImageCmd {
            texture,
            dest: ScreenRect::new(10, 10, 110, 34),
            src: ScreenRect::new(50, 0, 100, 24),
            tint: Color::WHITE,
        };
        let inst = ImageInstance::from_cmd(&cmd);
        assert_eq!(inst.origin, [10.0, 10.0]);
        assert_eq!(inst.size, [100.0, 24.0]);
        assert_eq!(inst.uv_min, [0.25, 0.0]);
        assert_eq!(inst.uv_max, [0.5, 1.0]);
    }
}
