//! Frame-in-flight pipelining: the fence-gated resource ring that lets the
//! CPU prepare one frame while the GPU still consumes earlier ones.
//!
//! [`ring::FrameRing`] owns [`FRAME_RING_DEPTH`] rotating slots of per-frame
//! resources. Reclaiming a slot blocks on its [`fence::FrameFence`] until the
//! GPU has finished the slot's previous submission, so the CPU never runs
//! more than [`FRAME_RING_DEPTH`] ticks ahead of the device.

/// Completion-fence trait and the pre-signaled startup fence.
pub mod fence;
/// Frame slot state machine and the fixed-depth resource ring.
pub mod ring;

pub use fence::{FrameFence, ReadyFence};
pub use ring::{FrameRing, FrameSlot, SlotState};

/// Number of frames that may be in flight at once.
///
/// Fixed at startup; the ring, the backpressure bound, and slot reuse
/// cadence all derive from this.
pub const FRAME_RING_DEPTH: usize = 3;
