//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the spherefield crate.
///
/// Everything here is a startup or shell failure; per-tick surface loss is
/// reported separately as [`wgpu::SurfaceError`] so the shell can
/// reconfigure and skip the frame.
#[derive(Debug)]
pub enum SphereFieldError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Invalid startup configuration (e.g. zero instances).
    Config(String),
    /// Simulation worker pool failed to build.
    WorkerPool(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for SphereFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::WorkerPool(msg) => {
                write!(f, "worker pool creation failed: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for SphereFieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for SphereFieldError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for SphereFieldError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
