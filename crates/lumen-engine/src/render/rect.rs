use bytemuck::{Pod, Zeroable};

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawList, RectCmd};

use super::common::{
    create_quad_pipeline, ensure_instance_buffer, instance_range, QuadBuffers, ViewportBinding,
    QUAD_INDEX_COUNT,
};

/// Solid rectangle renderer.
///
/// All rectangles of a scene share one instance buffer; each run of
/// consecutive rectangles is one instanced call. Colors are converted to
/// linear premultiplied RGBA on the CPU.
#[derive(Default)]
pub struct RectRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    viewport: Option<ViewportBinding>,
    quad: Option<QuadBuffers>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
    instances: Vec<RectInstance>,
}

impl RectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads every rectangle of `draw_list` as one instance buffer, in
    /// recording order. Call once per frame before [`render_run`](Self::render_run).
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>, draw_list: &DrawList) {
        self.instances.clear();
        self.instances.extend(draw_list.rects().map(RectInstance::from_cmd));
        if self.instances.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx, "lumen rect quad"));
        }
        ensure_instance_buffer(
            ctx,
            "lumen rect instance vbo",
            &mut self.instance_vbo,
            &mut self.instance_capacity,
            self.instances.len(),
            std::mem::size_of::<RectInstance>(),
        );

        if let (Some(viewport), Some(instance_vbo)) = (self.viewport.as_ref(), self.instance_vbo.as_ref()) {
            viewport.write(ctx);
            ctx.queue
                .write_buffer(instance_vbo, 0, bytemuck::cast_slice(&self.instances));
        }
    }

    /// Draws prepared rectangles `first..first + count` in one instanced call.
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

        let mut rpass = target.load_pass("lumen rect pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &viewport.bind_group, &[]);
        rpass.set_vertex_buffer(0, quad.vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDEX_COUNT, 0, range);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let viewport = ViewportBinding::new(ctx, "lumen rect viewport");
        let pipeline = create_quad_pipeline(
            ctx,
            "lumen rect pipeline",
            include_str!("shaders/rect.wgsl"),
            &[&viewport.layout],
            RectInstance::layout(),
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.viewport = Some(viewport);
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct RectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

impl RectInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    fn from_cmd(cmd: &RectCmd) -> Self {
        let r = cmd.rect;
        Self {
            origin: [r.x0 as f32, r.y0 as f32],
            size: [r.width() as f32, r.height() as f32],
            color: cmd.color.to_linear_premul(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::ScreenRect;
    use crate::paint::Color;

    #[test]
    fn instance_uses_corner_and_extent() {
        let cmd = RectCmd {
            rect: ScreenRect::new(4, 6, 14, 26),
            color: Color::WHITE,
        };
        let inst = RectInstance::from_cmd(&cmd);
        assert_eq!(inst.origin, [4.0, 6.0]);
        assert_eq!(inst.size, [10.0, 20.0]);
        assert!((inst.color[3] - 1.0).abs() < f32::EPSILON);
    }
}
