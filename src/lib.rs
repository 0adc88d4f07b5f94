// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// GPU / graphics allowances: casts between index and float domains are
// intentional and bounded
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
// Float comparison: graphics math frequently compares against 0.0, 1.0, etc.
#![allow(clippy::float_cmp)]
// Pedantic allowances
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::default_trait_access)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::use_self)]
#![allow(clippy::redundant_pub_crate)]
// Multiple crate versions: transitive deps, not actionable
#![allow(clippy::multiple_crate_versions)]

//! GPU draw-submission stress demo built on wgpu.
//!
//! Renders a large regular grid of quads (40,000 by default) where every quad
//! is an independent draw call sourcing its position from a single shared
//! uniform buffer via a dynamic byte offset. Alongside the draw loop it keeps
//! two independently smoothed performance clocks: one for the host submission
//! path and one for asynchronous device execution.
//!
//! # Key entry points
//!
//! - [`engine::StressEngine`] - per-frame acquire/record/submit/present
//! - [`renderer::quad_grid::QuadGridRenderer`] - pipeline and the
//!   per-instance bind/draw loop
//! - [`gpu::layout::InstanceLayout`] - alignment-constrained record layout
//! - [`util::frame_clock::FrameClock`] - dual submission/execution timing
//! - [`options::Options`] - runtime configuration (grid size, window, vsync)
//!
//! # Architecture
//!
//! Setup packs one 16-byte position record per grid cell into a uniform
//! buffer at the device's minimum offset alignment. Each frame the engine
//! ticks the submission clock, acquires the next surface texture, rewrites
//! the shared frame color in place, then records one bind-group set and one
//! four-vertex draw per instance before submitting. A completion callback
//! registered with the queue ticks the execution clock on the device
//! timeline; a non-blocking device poll at the top of every frame pumps
//! those callbacks without ever stalling submission.

pub mod engine;
pub mod error;
pub mod gpu;
pub mod grid;
pub mod options;
pub mod renderer;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::StressEngine;
pub use error::QuadStressError;
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
