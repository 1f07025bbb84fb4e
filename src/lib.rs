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

//! Frame-pipelined sphere-field renderer built on wgpu.
//!
//! Spherefield simulates and draws a large, continuously respawning field
//! of spheres streaming toward the camera. The interesting part is not the
//! spheres — it is keeping a parallel CPU simulation step and a
//! multi-frame-buffered GPU submission pipeline overlapped without races
//! or stalls:
//!
//! - [`frame::FrameRing`] rotates three sets of per-frame GPU buffers,
//!   gated by completion fences, so the CPU prepares frame K+1 while the
//!   GPU still consumes frame K and never runs further ahead than that.
//! - [`sim::UpdateScheduler`] partitions the instance index space into
//!   disjoint ranges and advances them on a fixed worker pool, joining
//!   before the tick proceeds.
//! - [`renderer::RenderSubmitter`] snapshots every instance into the
//!   reclaimed slot's buffer and issues each instance's draw exactly once
//!   per frame.
//!
//! # Key entry points
//!
//! - [`engine::FieldRenderEngine`] - the per-run engine driving the tick
//! - [`Viewer`] - standalone winit window (feature `viewer`)
//! - [`options::Options`] - startup configuration with TOML presets

pub mod camera;
pub mod engine;
pub mod error;
pub mod frame;
pub mod gpu;
pub mod input;
pub mod options;
pub mod renderer;
pub mod sim;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::FieldRenderEngine;
pub use error::SphereFieldError;
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
