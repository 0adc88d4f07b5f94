//! Rendering subsystems for the stress demo.
//!
//! One renderer: the dynamically-offset quad grid.

pub mod quad_grid;
