//! Per-frame snapshot, command recording, and submission.

use crate::gpu::render_context::RenderContext;
use crate::gpu::{SharedUniforms, SlotBuffers, SubmissionFence};
use crate::sim::InstanceStore;

use super::sphere::SphereRenderer;

/// Records and submits one frame's GPU work from a reclaimed frame slot.
pub struct RenderSubmitter {
    clear_color: wgpu::Color,
}

impl Default for RenderSubmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSubmitter {
    /// Submitter with the default (near-black) clear color.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clear_color: wgpu::Color {
                r: 0.004,
                g: 0.005,
                b: 0.012,
                a: 1.0,
            },
        }
    }

    /// Snapshot the instance store into `slot`, record one draw per
    /// instance, and submit.
    ///
    /// Returns the armed completion fence for the submission; by the time
    /// this returns, the CPU has handed off all work for the tick, and the
    /// slot's buffer must not be touched again until the frame ring
    /// observes that fence signaled.
    pub fn submit(
        &self,
        context: &RenderContext,
        target: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        sphere: &SphereRenderer,
        slot: &SlotBuffers,
        store: &InstanceStore,
        shared: &SharedUniforms,
    ) -> SubmissionFence {
        slot.write_snapshot(&context.queue, store, shared);

        let mut encoder = context.create_encoder();
        {
            let mut render_pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("sphere field pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: target,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(self.clear_color),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: depth,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });
            sphere.draw(&mut render_pass, slot);
        }

        let index = context.submit(encoder);
        SubmissionFence::arm(&context.device, &context.queue, index)
    }
}
