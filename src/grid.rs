//! Row-major generation and packing of per-instance grid records.
//!
//! Each cell of an N x N grid gets one 16-byte record holding its world
//! offset. Records are generated once at setup and packed into a single
//! byte vector at the aligned stride the device demands for dynamic
//! uniform offsets.

/// Per-instance uniform record.
///
/// Matches the WGSL `InstanceUniforms` block:
///   world: vec4<f32>   (offset 0)
///   Total: 16 bytes
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRecord {
    /// World-space XY offset applied to every vertex of the quad.
    pub offset: [f32; 2],
    /// Pads the record out to the shader's vec4 slot.
    pub _pad: [f32; 2],
}

impl InstanceRecord {
    /// Record positioned at the given world offset.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            offset: [x, y],
            _pad: [0.0; 2],
        }
    }
}

/// Generate records for a `side` x `side` grid in row-major order.
///
/// Cell `(row, col)` gets offset `(2*col/side, 2*row/side)`, spreading the
/// grid over `[0, 2)` in both axes; added to a quad anchored at the NDC
/// corner `(-1, -1)` this tiles the full viewport.
#[must_use]
pub fn generate(side: u32) -> Vec<InstanceRecord> {
    let mut records =
        Vec::with_capacity(side as usize * side as usize);
    for row in 0..side {
        for col in 0..side {
            records.push(InstanceRecord::new(
                2.0 * col as f32 / side as f32,
                2.0 * row as f32 / side as f32,
            ));
        }
    }
    records
}

/// Pack records into one contiguous byte vector, record `i` starting at
/// byte `i * stride`. Bytes between records stay zeroed. `stride` must be
/// at least the record size.
#[must_use]
pub fn pack(records: &[InstanceRecord], stride: u32) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = vec![0u8; records.len() * stride];
    for (i, record) in records.iter().enumerate() {
        let src = bytemuck::bytes_of(record);
        bytes[i * stride..i * stride + src.len()].copy_from_slice(src);
    }
    bytes
}
