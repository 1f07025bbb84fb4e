//! Per-tick update and render orchestration.

use glam::Vec3;

use super::{create_depth_view, FieldRenderEngine};
use crate::gpu::SharedUniforms;
use crate::input::CameraMotion;

impl FieldRenderEngine {
    /// Advance the simulation by `dt` seconds.
    ///
    /// Drains the input queue into the camera controller, then runs the
    /// partitioned parallel instance update. Returns only after every
    /// worker task has completed; the store is fully consistent when the
    /// render half of the tick starts.
    pub fn update(&mut self, dt: f32) {
        for event in self.input.drain() {
            match self.pointer.interpret(event) {
                Some(CameraMotion::Rotate(delta)) => {
                    self.camera_controller.rotate(delta);
                }
                Some(CameraMotion::Pan(delta)) => {
                    self.camera_controller.pan(delta);
                }
                Some(CameraMotion::Zoom(delta)) => {
                    self.camera_controller.zoom(delta);
                }
                None => {}
            }
        }

        self.scheduler.update(&mut self.store, dt, self.ring.tick());
    }

    /// Render and present one frame.
    ///
    /// Acquires a surface image, reclaims the tick's frame slot (blocking
    /// on its fence if the GPU is still consuming it), snapshots the
    /// instance store into the slot's buffer, records one draw per
    /// instance, submits, and presents. By the time this returns the CPU
    /// has handed off all work for the tick.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] when the surface is lost or outdated
    /// (e.g. mid-resize); the caller should [`resize`](Self::resize) and
    /// skip the frame. Simulation state is untouched by surface loss.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.frame_timing.should_render() {
            return Ok(());
        }

        let frame = self.context.acquire_frame()?;
        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let camera = &self.camera_controller.camera;
        let shared = SharedUniforms {
            view_proj: camera.build_matrix(),
            eye: camera.eye,
            light_dir: Vec3::new(-0.35, -0.9, 0.25).normalize(),
        };

        let slot = self.ring.begin_frame();
        let buffers = slot.begin_recording();
        let fence = self.submitter.submit(
            &self.context,
            &target,
            &self.depth_view,
            &self.sphere_renderer,
            buffers,
            &self.store,
            &shared,
        );
        self.ring.end_frame(Box::new(fence));

        frame.present();
        let _ = self.frame_timing.end_frame();
        Ok(())
    }

    /// Reconfigure surface-dependent state for a new window size (also the
    /// recovery path after a lost/outdated surface). Simulation state and
    /// the frame ring's instance buffers are untouched.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.depth_view = create_depth_view(&self.context);
        self.camera_controller.resize(width, height);
    }
}
