//! Frame completion fence backed by a wgpu submission index.
//!
//! wgpu has no standalone fence object; completion of a submission is
//! observable through `Queue::on_submitted_work_done` callbacks and
//! `Device::poll`. This pairs the two into the [`FrameFence`] shape the
//! frame ring expects: an atomic flag flipped by the callback for the
//! non-blocking check, and a targeted submission-index wait for the
//! blocking path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::frame::FrameFence;

/// Completion fence for one submitted frame.
pub struct SubmissionFence {
    device: wgpu::Device,
    index: wgpu::SubmissionIndex,
    done: Arc<AtomicBool>,
}

impl SubmissionFence {
    /// Arm a fence for work just submitted to `queue`.
    ///
    /// Must be called after the submission that produced `index`; the
    /// completion callback registered here covers everything submitted up
    /// to that point.
    pub fn arm(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        index: wgpu::SubmissionIndex,
    ) -> Self {
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        queue.on_submitted_work_done(move || {
            flag.store(true, Ordering::SeqCst);
        });
        Self {
            device: device.clone(),
            index,
            done,
        }
    }
}

impl FrameFence for SubmissionFence {
    fn is_signaled(&self) -> bool {
        if self.done.load(Ordering::SeqCst) {
            return true;
        }
        // Pump the device so a completed callback gets a chance to run.
        let _ = self.device.poll(wgpu::PollType::Poll);
        self.done.load(Ordering::SeqCst)
    }

    fn wait(&self) {
        let _ = self
            .device
            .poll(wgpu::PollType::WaitForSubmissionIndex(self.index.clone()));
        self.done.store(true, Ordering::SeqCst);
    }
}
