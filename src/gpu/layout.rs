//! Alignment-constrained layout for per-instance uniform records.
//!
//! Dynamic uniform offsets must be multiples of the device's
//! `min_uniform_buffer_offset_alignment`, so records are packed at a stride
//! rounded up to that alignment. The stride is computed exactly once at
//! setup; draw submission only multiplies, never rounds.

use std::fmt;

/// Errors from instance layout computation or verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// The stored stride is not a multiple of the device alignment.
    MisalignedStride {
        /// Stride carried by the layout, in bytes.
        stride: u32,
        /// Device-required offset alignment, in bytes.
        alignment: u32,
    },
    /// The highest instance offset does not fit in a 32-bit dynamic offset.
    OffsetOverflow {
        /// Number of instances requested.
        count: u32,
        /// Stride between records, in bytes.
        stride: u32,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MisalignedStride { stride, alignment } => write!(
                f,
                "stride {stride} is not a multiple of the device offset \
                 alignment {alignment}"
            ),
            Self::OffsetOverflow { count, stride } => write!(
                f,
                "{count} instances at stride {stride} exceed the 32-bit \
                 dynamic offset range"
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

/// Round `logical_size` up to the next multiple of `alignment`.
///
/// `alignment` must be a power of two (wgpu reports its offset alignment
/// limits that way). Returns `logical_size` unchanged when already aligned.
#[must_use]
pub const fn aligned_stride(logical_size: u32, alignment: u32) -> u32 {
    (logical_size + alignment - 1) & !(alignment - 1)
}

/// Immutable packing layout for a table of equally-sized uniform records.
///
/// Carries the aligned stride and instance count; byte offsets are derived
/// by multiplication only, so every instance lands exactly where setup
/// packed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceLayout {
    stride: u32,
    count: u32,
}

impl InstanceLayout {
    /// Compute the layout for `count` records of `logical_size` bytes at
    /// the given offset alignment.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::OffsetOverflow`] if the highest instance
    /// offset would not fit in a `u32` dynamic offset.
    pub fn new(
        logical_size: u32,
        alignment: u32,
        count: u32,
    ) -> Result<Self, LayoutError> {
        let stride = aligned_stride(logical_size, alignment);
        if let Some(last) = count.checked_sub(1) {
            let highest = u64::from(last) * u64::from(stride);
            if highest > u64::from(u32::MAX) {
                return Err(LayoutError::OffsetOverflow { count, stride });
            }
        }
        Ok(Self { stride, count })
    }

    /// Byte distance between consecutive records.
    #[must_use]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Number of records in the table.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Byte offset of record `index`. `index` must be below
    /// [`count`](Self::count).
    #[must_use]
    pub fn byte_offset(&self, index: u32) -> u32 {
        index * self.stride
    }

    /// All record offsets in ascending instance order.
    pub fn offsets(&self) -> impl Iterator<Item = u32> {
        let stride = self.stride;
        (0..self.count).map(move |index| index * stride)
    }

    /// Total packed size of the table in bytes.
    #[must_use]
    pub fn buffer_len(&self) -> u64 {
        u64::from(self.count) * u64::from(self.stride)
    }

    /// Check the stored stride against the live device alignment.
    ///
    /// A mismatch means the layout was computed for different hardware
    /// limits than the buffer is being created on; offsets derived from it
    /// would be rejected at draw time.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MisalignedStride`] on mismatch.
    pub fn verify_alignment(&self, alignment: u32) -> Result<(), LayoutError> {
        if self.stride % alignment != 0 {
            return Err(LayoutError::MisalignedStride {
                stride: self.stride,
                alignment,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_stride_rounds_up() {
        assert_eq!(aligned_stride(16, 256), 256);
        assert_eq!(aligned_stride(1, 256), 256);
        assert_eq!(aligned_stride(257, 256), 512);
        assert_eq!(aligned_stride(16, 64), 64);
        assert_eq!(aligned_stride(80, 64), 128);
    }

    #[test]
    fn test_aligned_stride_identity_when_aligned() {
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(512, 256), 512);
        assert_eq!(aligned_stride(64, 64), 64);
    }

    #[test]
    fn test_aligned_stride_unique_multiple_in_window() {
        // The result is the only multiple of the alignment in
        // [logical, logical + alignment).
        for alignment in [16u32, 64, 256] {
            for logical in 1..=1024u32 {
                let stride = aligned_stride(logical, alignment);
                assert_eq!(stride % alignment, 0);
                assert!(stride >= logical);
                assert!(stride < logical + alignment);
            }
        }
    }

    #[test]
    fn test_offsets_are_injective_and_ascending() {
        let layout = InstanceLayout::new(16, 256, 100).unwrap();
        let offsets: Vec<u32> = layout.offsets().collect();
        assert_eq!(offsets.len(), 100);
        for pair in offsets.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_full_grid_offset_enumeration() {
        // 200x200 grid: 40,000 offsets, strictly ascending, one stride apart.
        let layout = InstanceLayout::new(16, 256, 200 * 200).unwrap();
        let offsets: Vec<u32> = layout.offsets().collect();
        assert_eq!(offsets.len(), 40_000);
        assert_eq!(offsets[0], 0);
        assert_eq!(offsets[39_999], 39_999 * layout.stride());
        for (index, offset) in offsets.iter().enumerate() {
            assert_eq!(*offset, index as u32 * layout.stride());
        }
    }

    #[test]
    fn test_offsets_stay_inside_buffer() {
        let layout = InstanceLayout::new(16, 256, 40_000).unwrap();
        let len = layout.buffer_len();
        for offset in layout.offsets() {
            assert!(u64::from(offset) + 16 <= len);
        }
    }

    #[test]
    fn test_offset_overflow_detected() {
        let err = InstanceLayout::new(16, 256, u32::MAX).unwrap_err();
        assert!(matches!(err, LayoutError::OffsetOverflow { .. }));

        // Largest count whose final offset still fits.
        let count = u32::MAX / 256 + 1;
        let layout = InstanceLayout::new(16, 256, count).unwrap();
        assert_eq!(layout.byte_offset(count - 1), (count - 1) * 256);
    }

    #[test]
    fn test_zero_count_layout_is_empty() {
        let layout = InstanceLayout::new(16, 256, 0).unwrap();
        assert_eq!(layout.count(), 0);
        assert_eq!(layout.buffer_len(), 0);
        assert_eq!(layout.offsets().count(), 0);
    }

    #[test]
    fn test_verify_alignment() {
        let layout = InstanceLayout::new(16, 64, 10).unwrap();
        assert_eq!(layout.verify_alignment(64), Ok(()));
        // 64-byte stride also satisfies any smaller power-of-two alignment.
        assert_eq!(layout.verify_alignment(16), Ok(()));
        assert_eq!(
            layout.verify_alignment(256),
            Err(LayoutError::MisalignedStride {
                stride: 64,
                alignment: 256
            })
        );
    }

    #[test]
    fn test_layout_error_display() {
        let err = LayoutError::MisalignedStride {
            stride: 64,
            alignment: 256,
        };
        assert!(err.to_string().contains("64"));
        assert!(err.to_string().contains("256"));
    }
}
