//! The frame-pipelined update/render engine.
//!
//! [`FieldRenderEngine`] owns every piece of per-run state and drives the
//! tick: parallel instance update, fence-gated frame-slot reclamation,
//! snapshot + draw submission, presentation. One instance of the engine is
//! one independent simulation — nothing here is process-global.

mod frame;

use crate::camera::CameraController;
use crate::error::SphereFieldError;
use crate::frame::{FrameRing, FRAME_RING_DEPTH};
use crate::gpu::render_context::RenderContext;
use crate::gpu::SlotBuffers;
use crate::input::{InputEvent, InputQueue, PointerState};
use crate::options::Options;
use crate::renderer::sphere::DEPTH_FORMAT;
use crate::renderer::{RenderSubmitter, SphereRenderer};
use crate::sim::{InstanceStore, UpdateScheduler};
use crate::util::FrameTiming;

/// Sphere-field rendering engine.
///
/// Construct with [`new`](Self::new), then per tick call
/// [`update`](Self::update) followed by [`render`](Self::render).
pub struct FieldRenderEngine {
    // Field order is drop order: frame slots and instance state release
    // before the device they were allocated from.
    /// Fence-gated ring of per-frame GPU buffers.
    ring: FrameRing<SlotBuffers>,
    /// All per-instance simulation state.
    store: InstanceStore,
    /// Fixed worker pool for the parallel update step.
    scheduler: UpdateScheduler,
    /// Shared sphere mesh and pipeline.
    sphere_renderer: SphereRenderer,
    /// Snapshot/record/submit protocol for one tick.
    submitter: RenderSubmitter,
    /// Orbital camera controller.
    pub camera_controller: CameraController,
    /// Events accumulated since the last tick.
    input: InputQueue,
    /// Pointer drag interpretation state.
    pointer: PointerState,
    /// FPS cap and smoothed-FPS tracking.
    frame_timing: FrameTiming,
    depth_view: wgpu::TextureView,
    options: Options,
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
}

impl FieldRenderEngine {
    /// Build the engine: GPU context, instance store, worker pool, frame
    /// ring, and pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`SphereFieldError`] if the configuration is invalid or any
    /// startup resource (device, surface, worker pool) cannot be created.
    /// There is no partial-running state: either everything initializes or
    /// nothing runs.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: Options,
    ) -> Result<Self, SphereFieldError> {
        let count = options.simulation.instance_count;
        if count == 0 {
            return Err(SphereFieldError::Config(
                "instance_count must be nonzero".into(),
            ));
        }

        let context =
            RenderContext::new(window, size, options.display.vsync).await?;

        let store = InstanceStore::new(count, options.simulation.sim_params());
        let scheduler =
            UpdateScheduler::new(options.simulation.worker_threads)?;

        let layout = SlotBuffers::create_layout(&context.device);
        let slots = (0..FRAME_RING_DEPTH)
            .map(|i| {
                SlotBuffers::new(
                    &context.device,
                    &layout,
                    count,
                    &format!("Frame Slot {i} Instances"),
                )
            })
            .collect();
        let ring = FrameRing::new(slots);

        let sphere_renderer = SphereRenderer::new(&context, &layout);
        let depth_view = create_depth_view(&context);

        let aspect = size.0 as f32 / size.1.max(1) as f32;
        let camera_controller =
            CameraController::new(&options.camera, aspect);

        log::info!(
            "engine up: {count} instances, {} workers, {FRAME_RING_DEPTH} \
             frames in flight",
            scheduler.worker_count()
        );

        Ok(Self {
            ring,
            store,
            scheduler,
            sphere_renderer,
            submitter: RenderSubmitter::new(),
            camera_controller,
            input: InputQueue::new(),
            pointer: PointerState::new(),
            frame_timing: FrameTiming::new(options.display.target_fps),
            depth_view,
            options,
            context,
        })
    }

    /// Queue an input event for the next tick.
    pub fn push_event(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Number of simulated instances.
    pub fn instance_count(&self) -> usize {
        self.store.len()
    }

    /// Number of simulation worker threads.
    pub fn worker_count(&self) -> usize {
        self.scheduler.worker_count()
    }

    /// Smoothed frames-per-second estimate.
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// The options the engine was built with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Completed ticks since startup.
    pub fn tick(&self) -> u64 {
        self.ring.tick()
    }
}

impl Drop for FieldRenderEngine {
    fn drop(&mut self) {
        // Drain the GPU queue before any frame-slot or instance resource
        // is released; in-flight submissions may still read them.
        self.context.wait_idle();
        log::debug!("engine shut down after {} ticks", self.ring.tick());
    }
}

/// Depth buffer sized to the current surface configuration.
fn create_depth_view(context: &RenderContext) -> wgpu::TextureView {
    let texture = context.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Buffer"),
        size: wgpu::Extent3d {
            width: context.config.width.max(1),
            height: context.config.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
