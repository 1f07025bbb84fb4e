//! Frame pacing: optional FPS cap, per-tick delta time, and a smoothed
//! FPS readout.

use web_time::{Duration, Instant};

/// Frame pacing: optional FPS cap, per-tick delta time, and a smoothed FPS
/// readout.
pub struct FrameTiming {
    /// Minimum frame duration derived from the FPS target (zero when
    /// unlimited).
    min_frame_duration: Duration,
    /// Timestamp of the previous completed frame.
    last_frame: Instant,
    /// Exponential-moving-average FPS.
    smoothed_fps: f32,
    /// EMA blend factor for new samples.
    smoothing: f32,
}

impl FrameTiming {
    /// Frame timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        Self {
            min_frame_duration,
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Whether enough time has passed since the last frame to render
    /// another under the FPS cap.
    pub fn should_render(&self) -> bool {
        self.min_frame_duration.is_zero()
            || self.last_frame.elapsed() >= self.min_frame_duration
    }

    /// Mark the end of a frame.
    ///
    /// Returns the elapsed wall time since the previous frame ended — the
    /// `dt` the next simulation tick integrates over — and folds it into
    /// the smoothed FPS.
    pub fn end_frame(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;

        let seconds = elapsed.as_secs_f32();
        if seconds > 0.0 {
            self.smoothed_fps = self.smoothed_fps
                * (1.0 - self.smoothing)
                + (1.0 / seconds) * self.smoothing;
        }
        elapsed
    }

    /// Smoothed frames-per-second estimate.
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_target_always_renders() {
        let timing = FrameTiming::new(0);
        assert!(timing.should_render());
    }

    #[test]
    fn capped_target_blocks_immediately_after_a_frame() {
        let mut timing = FrameTiming::new(5);
        let _ = timing.end_frame();
        // 200ms cannot have elapsed since end_frame.
        assert!(!timing.should_render());
    }

    #[test]
    fn end_frame_reports_elapsed_time() {
        let mut timing = FrameTiming::new(0);
        std::thread::sleep(Duration::from_millis(10));
        let dt = timing.end_frame();
        assert!(dt >= Duration::from_millis(10));
    }
}
