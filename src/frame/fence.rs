//! GPU completion fences as seen by the frame ring.

/// A GPU→CPU signal confirming that one submitted frame has finished
/// executing on the device.
///
/// The ring only ever asks two questions of a fence: "is it done yet?"
/// (non-blocking) and "block me until it is". How the signal is produced is
/// a backend concern — the wgpu implementation lives in
/// [`crate::gpu::submission_fence`], and tests substitute hand-driven
/// fences.
pub trait FrameFence: Send {
    /// Non-blocking status check. Once this returns `true` it must keep
    /// returning `true` for the lifetime of the fence.
    fn is_signaled(&self) -> bool;

    /// Block the calling thread until the fence signals.
    ///
    /// No timeout is applied: a device that never finishes stalls the
    /// caller indefinitely.
    fn wait(&self);
}

/// A fence that is born signaled.
///
/// Every ring slot starts with one of these so first-time reclamation never
/// blocks.
pub struct ReadyFence;

impl FrameFence for ReadyFence {
    fn is_signaled(&self) -> bool {
        true
    }

    fn wait(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_fence_is_always_signaled() {
        let fence = ReadyFence;
        assert!(fence.is_signaled());
        // Must not block.
        fence.wait();
        assert!(fence.is_signaled());
    }
}
