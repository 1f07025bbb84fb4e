//! Input handling: platform-agnostic events, the per-tick queue, and the
//! pointer state machine that turns drags into camera motions.
//!
//! The shell pushes events as they arrive; the engine drains the queue
//! exactly once per tick. Nothing here dispatches callbacks — camera
//! motion is data handed to the controller at a single well-defined point
//! in the frame.

/// Platform-agnostic input events.
pub mod event;
/// Per-tick event queue and pointer interpretation.
pub mod queue;

pub use event::{InputEvent, PointerButton};
pub use queue::{CameraMotion, InputQueue, PointerState};
