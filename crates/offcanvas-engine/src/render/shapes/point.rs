use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    premul_alpha_blend, ubo_min_binding_size, QuadVertex, QUAD_INDICES, QUAD_VERTICES,
};

/// Affine map from one data axis to surface pixels: `px = v * scale + offset`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AxisMap {
    pub scale: f32,
    pub offset: f32,
}

impl AxisMap {
    #[inline]
    pub const fn new(scale: f32, offset: f32) -> Self {
        Self { scale, offset }
    }

    #[inline]
    pub fn apply(self, v: f32) -> f32 {
        v * self.scale + self.offset
    }
}

/// One point of a series, in data space.
///
/// `size` is the marker area in square pixels; `color` is premultiplied.
///
/// Instance data layout (28 bytes):
///
///  offset  0  center  [f32; 2]   loc 1
///  offset  8  color   [f32; 4]   loc 2
///  offset 24  size    f32        loc 3
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub center: [f32; 2],
    pub color: [f32; 4],
    pub size: f32,
}

impl PointInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2, // center
        2 => Float32x4, // color
        3 => Float32    // size
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Instanced renderer for a point series.
///
/// Instance data is uploaded once per data revision; the data-to-pixel maps go
/// through a small uniform, so animating the visible domain costs one 32-byte
/// write per frame no matter how many points there are.
///
/// Points are drawn as anti-aliased discs.
#[derive(Default)]
pub struct PointRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    plot_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
    instance_count: u32,

    /// Data revision currently resident in `instance_vbo`.
    revision: Option<u64>,
}

impl PointRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `revision` is already resident on the GPU.
    pub fn is_current(&self, revision: u64) -> bool {
        self.revision == Some(revision)
    }

    /// Uploads `instances` unless `revision` is already resident.
    ///
    /// Returns whether an upload happened.
    pub fn upload(
        &mut self,
        ctx: &RenderCtx<'_>,
        revision: u64,
        instances: &[PointInstance],
    ) -> bool {
        if self.is_current(revision) {
            return false;
        }

        self.instance_count = instances.len() as u32;
        self.revision = Some(revision);

        if instances.is_empty() {
            return true;
        }

        self.ensure_instance_capacity(ctx, instances.len());
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return false };
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(instances));

        log::debug!("uploaded {} point instances (revision {revision})", instances.len());
        true
    }

    /// Draws the resident instances with the given data-to-pixel maps.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        x: AxisMap,
        y: AxisMap,
    ) {
        if self.instance_count == 0 || !ctx.viewport.is_valid() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);
        self.write_plot_uniform(ctx, x, y);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("offcanvas point pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, 0..self.instance_count);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("offcanvas point shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/point.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("offcanvas point bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: ubo_min_binding_size::<PlotUniform>(),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("offcanvas point pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("offcanvas point pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), PointInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.plot_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.plot_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let plot_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("offcanvas point plot ubo"),
            size: std::mem::size_of::<PlotUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("offcanvas point bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: plot_ubo.as_entire_binding(),
            }],
        });

        self.plot_ubo = Some(plot_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("offcanvas point quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("offcanvas point quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_plot_uniform(&mut self, ctx: &RenderCtx<'_>, x: AxisMap, y: AxisMap) {
        let Some(ubo) = self.plot_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&PlotUniform::new(ctx, x, y)));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(64);
        let new_size = (new_cap * std::mem::size_of::<PointInstance>()) as u64;
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("offcanvas point instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PlotUniform {
    viewport: [f32; 2],
    x_map: [f32; 2], // (.x = scale, .y = offset)
    y_map: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

impl PlotUniform {
    fn new(ctx: &RenderCtx<'_>, x: AxisMap, y: AxisMap) -> Self {
        Self {
            viewport: [ctx.viewport.width.max(1.0), ctx.viewport.height.max(1.0)],
            x_map: [x.scale, x.offset],
            y_map: [y.scale, y.offset],
            _pad: [0.0; 2],
        }
    }
}
