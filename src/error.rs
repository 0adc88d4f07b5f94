//! Crate-level error types.

use std::fmt;

use crate::gpu::layout::LayoutError;
use crate::gpu::render_context::RenderContextError;

/// Errors produced by the quadstress crate.
#[derive(Debug)]
pub enum QuadStressError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Instance layout computation or verification failure.
    Layout(LayoutError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for QuadStressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Layout(e) => write!(f, "layout error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for QuadStressError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Layout(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::OptionsParse(_) | Self::Viewer(_) => None,
        }
    }
}

impl From<RenderContextError> for QuadStressError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<LayoutError> for QuadStressError {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}

impl From<std::io::Error> for QuadStressError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
