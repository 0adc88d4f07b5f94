//! Shared utilities for the stress engine.
//!
//! Helpers for HSV color cycling and dual-timeline frame timing.

pub mod color;
pub mod frame_clock;
