//! Shared sphere geometry and pipeline.
//!
//! One icosphere mesh and one render pipeline serve every instance; what
//! varies per draw is the dynamic-offset binding into the frame slot's
//! uniform buffer.

use glam::Vec3;
use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;
use crate::gpu::SlotBuffers;

/// Icosphere subdivision level (1 = 80 triangles, 2 = 320).
const SUBDIVISIONS: u32 = 2;

/// Depth buffer format shared with the engine's depth texture.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Vertex of the shared unit-sphere mesh.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct SphereVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

/// Sphere mesh buffers and the instance-uniform render pipeline.
pub struct SphereRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl SphereRenderer {
    /// Build the shared mesh and pipeline against the slot-buffer layout.
    pub fn new(
        context: &RenderContext,
        instance_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let (vertices, indices) = generate_icosphere(SUBDIVISIONS);

        let vertex_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Sphere Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Sphere Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        let pipeline = create_pipeline(context, instance_layout);

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Record one draw per instance against the shared mesh, each bound to
    /// its own region of the slot's uniform buffer.
    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        slot: &SlotBuffers,
    ) {
        if slot.count() == 0 {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(
            self.index_buffer.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        for i in 0..slot.count() {
            render_pass.set_bind_group(
                0,
                slot.bind_group(),
                &[slot.offset(i)],
            );
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }
    }
}

fn create_pipeline(
    context: &RenderContext,
    instance_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = context.device.create_shader_module(wgpu::include_wgsl!(
        "../../assets/shaders/spheres.wgsl"
    ));

    let pipeline_layout = context.device.create_pipeline_layout(
        &wgpu::PipelineLayoutDescriptor {
            label: Some("Sphere Pipeline Layout"),
            bind_group_layouts: &[instance_layout],
            push_constant_ranges: &[],
        },
    );

    let vertex_layout = wgpu::VertexBufferLayout {
        array_stride: size_of::<SphereVertex>()
            as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0, // position
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 1, // normal
            },
        ],
    };

    context.device.create_render_pipeline(
        &wgpu::RenderPipelineDescriptor {
            label: Some("Sphere Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        },
    )
}

/// Generate a unit icosphere: start from an icosahedron and subdivide each
/// triangle into four, re-projecting midpoints onto the sphere.
///
/// Level 0 = 20 triangles, level 1 = 80, level 2 = 320.
fn generate_icosphere(subdivisions: u32) -> (Vec<SphereVertex>, Vec<u32>) {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let inv_len = 1.0 / (1.0 + phi * phi).sqrt();

    let mut positions: Vec<Vec3> = vec![
        Vec3::new(-1.0, phi, 0.0) * inv_len,
        Vec3::new(1.0, phi, 0.0) * inv_len,
        Vec3::new(-1.0, -phi, 0.0) * inv_len,
        Vec3::new(1.0, -phi, 0.0) * inv_len,
        Vec3::new(0.0, -1.0, phi) * inv_len,
        Vec3::new(0.0, 1.0, phi) * inv_len,
        Vec3::new(0.0, -1.0, -phi) * inv_len,
        Vec3::new(0.0, 1.0, -phi) * inv_len,
        Vec3::new(phi, 0.0, -1.0) * inv_len,
        Vec3::new(phi, 0.0, 1.0) * inv_len,
        Vec3::new(-phi, 0.0, -1.0) * inv_len,
        Vec3::new(-phi, 0.0, 1.0) * inv_len,
    ];

    // CCW winding for outward-facing normals.
    #[rustfmt::skip]
    let mut indices: Vec<u32> = vec![
        0, 5, 11,   0, 1, 5,    0, 7, 1,    0, 10, 7,   0, 11, 10,
        1, 9, 5,    5, 4, 11,   11, 2, 10,  10, 6, 7,   7, 8, 1,
        3, 4, 9,    3, 2, 4,    3, 6, 2,    3, 8, 6,    3, 9, 8,
        4, 5, 9,    2, 11, 4,   6, 10, 2,   8, 7, 6,    9, 1, 8,
    ];

    let mut midpoint_cache: FxHashMap<(u32, u32), u32> =
        FxHashMap::default();

    for _ in 0..subdivisions {
        let mut next = Vec::with_capacity(indices.len() * 4);
        for tri in indices.chunks(3) {
            let (v0, v1, v2) = (tri[0], tri[1], tri[2]);
            let a = midpoint(&mut positions, &mut midpoint_cache, v0, v1);
            let b = midpoint(&mut positions, &mut midpoint_cache, v1, v2);
            let c = midpoint(&mut positions, &mut midpoint_cache, v2, v0);
            next.extend_from_slice(&[v0, a, c]);
            next.extend_from_slice(&[v1, b, a]);
            next.extend_from_slice(&[v2, c, b]);
            next.extend_from_slice(&[a, b, c]);
        }
        indices = next;
    }

    // Unit sphere: normal = position.
    let vertices = positions
        .iter()
        .map(|&p| SphereVertex {
            position: p.to_array(),
            normal: p.to_array(),
        })
        .collect();

    (vertices, indices)
}

/// Get or create the vertex halfway between `v0` and `v1`, normalized back
/// onto the unit sphere. Cached so shared edges reuse the same vertex.
fn midpoint(
    positions: &mut Vec<Vec3>,
    cache: &mut FxHashMap<(u32, u32), u32>,
    v0: u32,
    v1: u32,
) -> u32 {
    let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
    if let Some(&idx) = cache.get(&key) {
        return idx;
    }

    let mid = ((positions[v0 as usize] + positions[v1 as usize]) * 0.5)
        .normalize();
    let idx = positions.len() as u32;
    positions.push(mid);
    let _ = cache.insert(key, idx);
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icosphere_vertex_and_triangle_counts() {
        let (v0, i0) = generate_icosphere(0);
        assert_eq!(v0.len(), 12);
        assert_eq!(i0.len(), 20 * 3);

        let (v1, i1) = generate_icosphere(1);
        assert_eq!(v1.len(), 42);
        assert_eq!(i1.len(), 80 * 3);

        let (v2, i2) = generate_icosphere(2);
        assert_eq!(v2.len(), 162);
        assert_eq!(i2.len(), 320 * 3);
    }

    #[test]
    fn icosphere_vertices_lie_on_the_unit_sphere() {
        let (vertices, indices) = generate_icosphere(2);
        for v in &vertices {
            let len = Vec3::from_array(v.position).length();
            assert!((len - 1.0).abs() < 1e-5);
        }
        for &i in &indices {
            assert!((i as usize) < vertices.len());
        }
    }
}
