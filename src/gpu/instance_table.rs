//! GPU-side table of per-instance uniform records.
//!
//! One uniform buffer carries every instance record at the aligned stride;
//! draws select a record by passing its byte offset through the dynamic
//! offset slot of the shared bind group. No per-instance bind groups are
//! ever created.

use wgpu::util::DeviceExt;

use crate::gpu::layout::{InstanceLayout, LayoutError};
use crate::gpu::render_context::RenderContext;
use crate::grid::{self, InstanceRecord};

/// Uniform buffer holding all instance records at a fixed aligned stride.
pub struct InstanceTable {
    buffer: wgpu::Buffer,
    layout: InstanceLayout,
}

impl InstanceTable {
    /// Pack `records` at the layout's stride and upload them into a single
    /// uniform buffer.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MisalignedStride`] if `layout` was computed
    /// for an offset alignment other than the live device's.
    pub fn new(
        context: &RenderContext,
        layout: InstanceLayout,
        records: &[InstanceRecord],
    ) -> Result<Self, LayoutError> {
        layout.verify_alignment(context.min_uniform_offset_alignment())?;

        let packed = grid::pack(records, layout.stride());
        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Instance Table Buffer"),
                contents: &packed,
                usage: wgpu::BufferUsages::UNIFORM,
            },
        );

        log::debug!(
            "instance table: {} records, stride {} B, {} B total",
            layout.count(),
            layout.stride(),
            layout.buffer_len()
        );

        Ok(Self { buffer, layout })
    }

    /// The packing layout backing this table.
    #[must_use]
    pub fn layout(&self) -> &InstanceLayout {
        &self.layout
    }

    /// Bind group layout entry for the table: a dynamically-offset uniform
    /// binding windowing one record at a time.
    #[must_use]
    pub fn layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: wgpu::BufferSize::new(
                    size_of::<InstanceRecord>() as u64,
                ),
            },
            count: None,
        }
    }

    /// Binding resource windowing a single record; the dynamic offset
    /// passed at draw time selects which one.
    #[must_use]
    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: wgpu::BufferSize::new(size_of::<InstanceRecord>() as u64),
        })
    }
}
