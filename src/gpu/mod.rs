//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, alignment-constrained
//! instance layout, and the dynamically-offset instance table.

/// Uniform buffer of per-instance records with dynamic-offset binding.
pub mod instance_table;
/// Aligned stride and byte-offset arithmetic for instance records.
pub mod layout;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
