//! Runtime configuration with TOML file support.
//!
//! Everything tweakable at startup (grid size, window geometry, vsync) is
//! consolidated here. Options serialize to/from TOML; every level carries
//! `#[serde(default)]` so partial files work correctly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::QuadStressError;

/// Grid-side default matching the original stress workload: 200 x 200
/// quads, 40,000 draw calls per frame.
pub const DEFAULT_GRID_SIDE: u32 = 200;

/// Instance grid dimensions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GridOptions {
    /// Number of quads per grid side; the frame issues `side * side` draws.
    pub side: u32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            side: DEFAULT_GRID_SIDE,
        }
    }
}

/// Window and presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WindowOptions {
    /// Window title.
    pub title: String,
    /// Initial window width in logical pixels.
    pub width: u32,
    /// Initial window height in logical pixels.
    pub height: u32,
    /// Throttle presentation to the display refresh rate. Off by default:
    /// a stress demo wants frame times to reflect submission load, not the
    /// compositor.
    pub vsync: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "Quad Stress".to_owned(),
            width: 1280,
            height: 720,
            vsync: false,
        }
    }
}

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Options {
    /// Instance grid dimensions.
    pub grid: GridOptions,
    /// Window and presentation settings.
    pub window: WindowOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`QuadStressError::Io`] if the file cannot be read or
    /// [`QuadStressError::OptionsParse`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, QuadStressError> {
        let content =
            std::fs::read_to_string(path).map_err(QuadStressError::Io)?;
        toml::from_str(&content)
            .map_err(|e| QuadStressError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`QuadStressError::OptionsParse`] if serialization fails or
    /// [`QuadStressError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), QuadStressError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| QuadStressError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(QuadStressError::Io)?;
        }
        std::fs::write(path, content).map_err(QuadStressError::Io)
    }
}
