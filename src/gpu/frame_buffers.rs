//! Per-frame-slot GPU-visible instance buffers.
//!
//! Each frame slot owns one uniform buffer holding a snapshot of every
//! instance's render state for that frame, laid out at an aligned stride so
//! a single dynamic-offset bind group covers all instances. The offset
//! table — instance `i` binds at `i * stride` — is the per-instance
//! resource arena: allocated once, keyed by stable instance index, living
//! exactly as long as the instance store it mirrors.

use glam::{Mat4, Vec3};

use crate::sim::InstanceStore;

/// GPU layout of one instance's per-frame state.
///
/// Camera and light direction are broadcast (identical in every region);
/// model matrix, color, and light params are per-instance.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceUniform {
    /// Combined view-projection matrix (shared across the frame).
    pub view_proj: [[f32; 4]; 4],
    /// Instance world transform.
    pub model: [[f32; 4]; 4],
    /// Instance RGBA color.
    pub color: [f32; 4],
    /// Camera world-space position (shared across the frame).
    pub eye: [f32; 3],
    /// Per-instance diffuse intensity.
    pub light_intensity: f32,
    /// Light direction (shared across the frame).
    pub light_dir: [f32; 3],
    /// Per-instance specular exponent.
    pub shininess: f32,
}

/// State broadcast into every instance's uniform region for one frame.
#[derive(Debug, Clone, Copy)]
pub struct SharedUniforms {
    /// Combined view-projection matrix.
    pub view_proj: Mat4,
    /// Camera world-space position.
    pub eye: Vec3,
    /// Directional light direction.
    pub light_dir: Vec3,
}

/// Round `size` up to the next multiple of `align` (a power of two).
fn aligned_stride(size: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    (size + align - 1) & !(align - 1)
}

/// One frame slot's GPU-visible instance buffer plus its dynamic-offset
/// bind group.
pub struct SlotBuffers {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u32,
    count: usize,
}

impl SlotBuffers {
    /// Bind group layout shared by every slot: one dynamically-offset
    /// uniform binding sized to a single [`InstanceUniform`].
    pub fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Instance Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX
                    | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        size_of::<InstanceUniform>() as u64,
                    ),
                },
                count: None,
            }],
        })
    }

    /// Allocate one slot's buffer for `count` instances.
    ///
    /// The stride honors the device's uniform-offset alignment; allocation
    /// failure aborts startup inside wgpu.
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        count: usize,
        label: &str,
    ) -> Self {
        let align = u64::from(
            device.limits().min_uniform_buffer_offset_alignment,
        );
        let stride = aligned_stride(
            size_of::<InstanceUniform>() as u64,
            align,
        ) as u32;

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: u64::from(stride) * count as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(
                        wgpu::BufferBinding {
                            buffer: &buffer,
                            offset: 0,
                            size: wgpu::BufferSize::new(
                                size_of::<InstanceUniform>()
                                    as u64,
                            ),
                        },
                    ),
                }],
            });

        Self {
            buffer,
            bind_group,
            stride,
            count,
        }
    }

    /// The slot's bind group (bound with [`offset`](Self::offset) per
    /// instance).
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Dynamic offset of instance `i`'s uniform region.
    pub fn offset(&self, i: usize) -> u32 {
        debug_assert!(i < self.count);
        self.stride * i as u32
    }

    /// Number of instance regions in this slot.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Copy every instance's render state plus the shared camera/light
    /// parameters into this slot's buffer.
    ///
    /// One mapped view, one disjoint region written per instance; region
    /// write order is immaterial. Only call on a slot the frame ring has
    /// reclaimed — the ring's fence gate is what makes this race-free.
    ///
    /// # Panics
    ///
    /// Fatal if the store's length does not match this slot's capacity;
    /// both are fixed at startup, so a mismatch is a construction bug.
    pub fn write_snapshot(
        &self,
        queue: &wgpu::Queue,
        store: &InstanceStore,
        shared: &SharedUniforms,
    ) {
        assert!(
            store.len() == self.count,
            "instance store len {} does not match slot capacity {}",
            store.len(),
            self.count
        );
        let total = u64::from(self.stride) * self.count as u64;
        let Some(size) = wgpu::BufferSize::new(total) else {
            return;
        };
        let Some(mut view) = queue.write_buffer_with(&self.buffer, 0, size)
        else {
            return;
        };

        let view_proj = shared.view_proj.to_cols_array_2d();
        let eye = shared.eye.to_array();
        let light_dir = shared.light_dir.to_array();
        for i in 0..self.count {
            let light = store.light(i);
            let uniform = InstanceUniform {
                view_proj,
                model: store.transform(i).to_cols_array_2d(),
                color: store.color(i).to_array(),
                eye,
                light_intensity: light.intensity,
                light_dir,
                shininess: light.shininess,
            };
            let start = (self.stride as usize) * i;
            let end = start + size_of::<InstanceUniform>();
            view[start..end].copy_from_slice(bytemuck::bytes_of(&uniform));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(aligned_stride(176, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(257, 256), 512);
        assert_eq!(aligned_stride(1, 64), 64);
    }

    #[test]
    fn uniform_layout_matches_wgsl_expectations() {
        // The WGSL mirror of InstanceUniform assumes these offsets; a
        // field reorder here must be mirrored in spheres.wgsl.
        assert_eq!(size_of::<InstanceUniform>(), 176);
        assert_eq!(std::mem::offset_of!(InstanceUniform, model), 64);
        assert_eq!(std::mem::offset_of!(InstanceUniform, color), 128);
        assert_eq!(std::mem::offset_of!(InstanceUniform, eye), 144);
        assert_eq!(
            std::mem::offset_of!(InstanceUniform, light_intensity),
            156
        );
        assert_eq!(std::mem::offset_of!(InstanceUniform, light_dir), 160);
        assert_eq!(std::mem::offset_of!(InstanceUniform, shininess), 172);
    }
}
