//! GPU resource management.
//!
//! Provides wgpu device/surface initialization, the per-slot GPU-visible
//! instance buffers, and the submission-backed completion fence the frame
//! ring gates on.

/// Per-frame-slot uniform buffers with a dynamic-offset binding arena.
pub mod frame_buffers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Frame fence backed by a wgpu submission index.
pub mod submission_fence;

pub use frame_buffers::{InstanceUniform, SharedUniforms, SlotBuffers};
pub use render_context::{RenderContext, RenderContextError};
pub use submission_fence::SubmissionFence;
