//! Batched quad-grid renderer driven by dynamic uniform offsets.
//!
//! One pipeline, one four-vertex strip quad, one bind group. Every instance
//! is its own draw call; the only state that changes between draws is the
//! dynamic byte offset selecting that instance's record in the shared
//! uniform table. The frame-level block holds an orthographic
//! view-projection written once at setup and a flat color whose hue cycles
//! every frame.

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::gpu::instance_table::InstanceTable;
use crate::gpu::layout::{InstanceLayout, LayoutError};
use crate::gpu::render_context::RenderContext;
use crate::grid::{self, InstanceRecord};
use crate::util::color::hsv_to_rgb;

/// Degrees the frame hue advances per submitted frame.
const HUE_STEP_DEGREES: u64 = 20;
/// Saturation of the cycling frame color.
const COLOR_SATURATION: f32 = 0.5;
/// Value (brightness) of the cycling frame color.
const COLOR_VALUE: f32 = 1.0;

/// Vertex of the shared quad.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    /// Position in NDC before the per-instance offset is applied.
    pub position: [f32; 2],
}

/// Strip-ordered tile in the bottom-left NDC corner, 0.005 on a side.
/// Instance offsets in [0, 2) spread copies of it across the viewport.
const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex {
        position: [-1.0, -0.995],
    },
    QuadVertex {
        position: [-1.0, -1.0],
    },
    QuadVertex {
        position: [-0.995, -0.995],
    },
    QuadVertex {
        position: [-0.995, -1.0],
    },
];

/// Vertex buffer layout for [`QuadVertex`].
#[must_use]
pub fn quad_vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<QuadVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: 0,
        }],
    }
}

/// Shared frame-level uniform block.
///
/// Matches the WGSL `FrameUniforms` block:
///   view_proj: mat4x4<f32>   (offset 0)
///   color: vec4<f32>         (offset 64)
///   Total: 80 bytes
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    /// Column-major orthographic view-projection, written once at setup.
    pub view_proj: [[f32; 4]; 4],
    /// Flat quad color; RGB cycles per frame, alpha stays at 1.
    pub color: [f32; 4],
}

impl FrameUniforms {
    /// Byte offset of the color field inside the GPU buffer. Per-frame
    /// color writes start here and leave the view-projection untouched.
    pub const COLOR_OFFSET: wgpu::BufferAddress = 64;

    fn new() -> Self {
        Self {
            view_proj: Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0)
                .to_cols_array_2d(),
            color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Flat color for a submitted frame: hue advances [`HUE_STEP_DEGREES`] per
/// frame around the wheel at half saturation, full value.
#[must_use]
pub fn frame_color(frame_index: u64) -> [f32; 3] {
    let hue = (frame_index * HUE_STEP_DEGREES) % 360;
    hsv_to_rgb(hue as f32, COLOR_SATURATION, COLOR_VALUE)
}

/// Per-instance recording operations the grid loop drives on a pass.
trait InstancePass {
    fn set_instance_offset(&mut self, offset: u32);
    fn draw_quad(&mut self);
}

/// Record one bind/draw pair per layout offset, in ascending instance
/// order. The pair is atomic: an offset is never bound without its draw
/// following immediately.
fn record_instances<P: InstancePass>(layout: &InstanceLayout, pass: &mut P) {
    for offset in layout.offsets() {
        pass.set_instance_offset(offset);
        pass.draw_quad();
    }
}

/// [`InstancePass`] writing into a live wgpu render pass.
struct GridPass<'a, 'p> {
    pass: &'a mut wgpu::RenderPass<'p>,
    bind_group: &'a wgpu::BindGroup,
}

impl InstancePass for GridPass<'_, '_> {
    fn set_instance_offset(&mut self, offset: u32) {
        self.pass.set_bind_group(0, self.bind_group, &[offset]);
    }

    fn draw_quad(&mut self) {
        self.pass.draw(0..4, 0..1);
    }
}

/// Renders the instance grid as one draw call per quad.
pub struct QuadGridRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    frame_buffer: wgpu::Buffer,
    uniforms: FrameUniforms,
    table: InstanceTable,
    bind_group: wgpu::BindGroup,
}

impl QuadGridRenderer {
    /// Build the full grid for `side * side` instances: generate and pack
    /// the records, upload the instance table, and create the pipeline.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the instance layout cannot satisfy the
    /// device's dynamic-offset constraints.
    pub fn new(context: &RenderContext, side: u32) -> Result<Self, LayoutError> {
        let records = grid::generate(side);
        let layout = InstanceLayout::new(
            size_of::<InstanceRecord>() as u32,
            context.min_uniform_offset_alignment(),
            records.len() as u32,
        )?;
        let table = InstanceTable::new(context, layout, &records)?;

        let uniforms = FrameUniforms::new();
        let frame_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Frame Uniform Buffer"),
                contents: bytemuck::bytes_of(&uniforms),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let vertex_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Quad Vertex Buffer"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let bind_group_layout = Self::create_bind_group_layout(context);
        let bind_group = Self::create_bind_group(
            context,
            &bind_group_layout,
            &frame_buffer,
            &table,
        );
        let pipeline = Self::create_pipeline(context, &bind_group_layout);

        Ok(Self {
            pipeline,
            vertex_buffer,
            frame_buffer,
            uniforms,
            table,
            bind_group,
        })
    }

    fn create_bind_group_layout(
        context: &RenderContext,
    ) -> wgpu::BindGroupLayout {
        context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Quad Grid Bind Group Layout"),
                entries: &[
                    // binding 0: frame uniforms (view-projection + color)
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX
                            | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    // binding 1: per-instance record behind the dynamic
                    // offset
                    InstanceTable::layout_entry(1),
                ],
            },
        )
    }

    fn create_bind_group(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        frame_buffer: &wgpu::Buffer,
        table: &InstanceTable,
    ) -> wgpu::BindGroup {
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Quad Grid Bind Group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: frame_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: table.binding(),
                    },
                ],
            })
    }

    fn create_pipeline(
        context: &RenderContext,
        bind_group_layout: &wgpu::BindGroupLayout,
    ) -> wgpu::RenderPipeline {
        let shader = context.device.create_shader_module(wgpu::include_wgsl!(
            "../../assets/shaders/quad_grid.wgsl"
        ));

        let pipeline_layout = context.device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some("Quad Grid Pipeline Layout"),
                bind_group_layouts: &[bind_group_layout],
                push_constant_ranges: &[],
            },
        );

        context.device.create_render_pipeline(
            &wgpu::RenderPipelineDescriptor {
                label: Some("Quad Grid Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[quad_vertex_buffer_layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: context.config.format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            },
        )
    }

    /// Number of instances the grid draws each frame.
    #[must_use]
    pub fn instance_count(&self) -> u32 {
        self.table.layout().count()
    }

    /// Advance the frame color to `frame_index`'s hue and upload only the
    /// color field. The view-projection bytes are never rewritten.
    pub fn update_color(&mut self, queue: &wgpu::Queue, frame_index: u64) {
        let [r, g, b] = frame_color(frame_index);
        self.uniforms.color[0] = r;
        self.uniforms.color[1] = g;
        self.uniforms.color[2] = b;
        queue.write_buffer(
            &self.frame_buffer,
            FrameUniforms::COLOR_OFFSET,
            bytemuck::bytes_of(&self.uniforms.color),
        );
    }

    /// Record the whole grid into `render_pass`: pipeline and shared vertex
    /// buffer bound once, then one bind-group set and one four-vertex draw
    /// per instance in ascending grid order.
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

        let mut pass = GridPass {
            pass: render_pass,
            bind_group: &self.bind_group,
        };
        record_instances(self.table.layout(), &mut pass);
    }
}

#[cfg(test)]
mod tests {
    use std::mem::offset_of;

    use super::*;

    #[test]
    fn test_frame_uniforms_match_shader_layout() {
        assert_eq!(size_of::<FrameUniforms>(), 80);
        assert_eq!(
            offset_of!(FrameUniforms, color),
            FrameUniforms::COLOR_OFFSET as usize
        );
    }

    #[test]
    fn test_initial_color_is_opaque_black() {
        let uniforms = FrameUniforms::new();
        assert_eq!(uniforms.color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_color_write_leaves_view_proj_bytes_untouched() {
        let mut uniforms = FrameUniforms::new();
        let before = bytemuck::bytes_of(&uniforms).to_vec();

        let [r, g, b] = frame_color(7);
        uniforms.color[0] = r;
        uniforms.color[1] = g;
        uniforms.color[2] = b;

        let after = bytemuck::bytes_of(&uniforms);
        let split = FrameUniforms::COLOR_OFFSET as usize;
        assert_eq!(&before[..split], &after[..split]);
        assert_eq!(uniforms.color[3], 1.0);
    }

    #[test]
    fn test_frame_color_cycles_every_eighteen_frames() {
        assert_eq!(frame_color(0), frame_color(18));
        assert_eq!(frame_color(5), frame_color(23));
        assert_ne!(frame_color(0), frame_color(9));
    }

    #[test]
    fn test_frame_color_first_frame() {
        // Frame 1: hue 20, half saturation, full value.
        let [r, g, b] = frame_color(1);
        assert!((r - 1.0).abs() < 1e-5);
        assert!((g - 2.0 / 3.0).abs() < 1e-5);
        assert!((b - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_view_proj_preserves_ndc_xy() {
        let uniforms = FrameUniforms::new();
        let vp = Mat4::from_cols_array_2d(&uniforms.view_proj);
        let mapped = vp * glam::Vec4::new(0.25, -0.75, 0.0, 1.0);
        assert!((mapped.x - 0.25).abs() < 1e-6);
        assert!((mapped.y + 0.75).abs() < 1e-6);
        assert_eq!(mapped.w, 1.0);
    }

    #[test]
    fn test_quad_vertices_span_one_tile() {
        for vertex in &QUAD_VERTICES {
            assert!(vertex.position[0] >= -1.0 && vertex.position[0] <= -0.995);
            assert!(vertex.position[1] >= -1.0 && vertex.position[1] <= -0.995);
        }
        let width = QUAD_VERTICES[2].position[0] - QUAD_VERTICES[0].position[0];
        let height =
            QUAD_VERTICES[0].position[1] - QUAD_VERTICES[1].position[1];
        assert!((width - 0.005).abs() < 1e-6);
        assert!((height - 0.005).abs() < 1e-6);
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Recorded {
        Bind(u32),
        Draw,
    }

    struct RecordingPass(Vec<Recorded>);

    impl InstancePass for RecordingPass {
        fn set_instance_offset(&mut self, offset: u32) {
            self.0.push(Recorded::Bind(offset));
        }

        fn draw_quad(&mut self) {
            self.0.push(Recorded::Draw);
        }
    }

    #[test]
    fn test_full_grid_records_one_bind_draw_pair_per_instance() {
        // 200x200 grid: 40,000 pairs in strictly ascending offset order.
        let layout = InstanceLayout::new(16, 256, 200 * 200).unwrap();
        let mut pass = RecordingPass(Vec::new());
        record_instances(&layout, &mut pass);

        assert_eq!(pass.0.len(), 80_000);
        for (index, pair) in pass.0.chunks(2).enumerate() {
            assert_eq!(
                pair[0],
                Recorded::Bind(index as u32 * layout.stride())
            );
            assert_eq!(pair[1], Recorded::Draw);
        }
    }

    #[test]
    fn test_single_instance_grid_records_one_pair() {
        let layout = InstanceLayout::new(16, 256, 1).unwrap();
        let mut pass = RecordingPass(Vec::new());
        record_instances(&layout, &mut pass);
        assert_eq!(pass.0, vec![Recorded::Bind(0), Recorded::Draw]);
    }

    #[test]
    fn test_vertex_layout_matches_struct() {
        let layout = quad_vertex_buffer_layout();
        assert_eq!(layout.array_stride, 8);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].shader_location, 0);
    }
}
