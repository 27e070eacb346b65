use bytemuck::{Pod, Zeroable};

use crate::{Mesh, RenderError};

/// Background color of the offscreen pass.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.45,
    g: 0.55,
    b: 0.60,
    a: 1.00,
};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SceneVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl SceneVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SceneVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };
}

/// Demo scene: one vertex-colored cube drawn with the frame ring's
/// constants at group 0. Reversed-depth convention throughout: depth is
/// cleared to 0.0 and compared with `Greater`.
pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    mesh: Mesh,
}

impl SceneRenderer {
    /// Build the pipeline from WGSL source. Validation failures surface
    /// as [`RenderError`] so the caller can degrade instead of panicking
    /// inside wgpu's default error handler.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        shader_source: &str,
        constants_layout: &wgpu::BindGroupLayout,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Result<Self, RenderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::Shader(err.to_string()));
        }

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[constants_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[SceneVertex::LAYOUT],
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Greater,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::Pipeline(err.to_string()));
        }

        let mut mesh = Mesh::new(device, "scene_cube", SceneVertex::LAYOUT);
        let (vertices, indices) = cube_mesh();
        mesh.set_vertices(device, queue, &vertices);
        mesh.set_indices(device, queue, &indices);

        Ok(Self { pipeline, mesh })
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, constants: &wgpu::BindGroup) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, constants, &[]);
        pass.set_vertex_buffer(0, self.mesh.vertex_buffer().slice(..));
        pass.set_index_buffer(self.mesh.index_buffer().slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.mesh.index_count(), 0, 0..1);
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

/// Unit cube, one color per face.
fn cube_mesh() -> (Vec<SceneVertex>, Vec<u16>) {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        // +Z
        ([0.84, 0.30, 0.28], [[-p, -p,  p], [ p, -p,  p], [ p,  p,  p], [-p,  p,  p]]),
        // -Z
        ([0.28, 0.64, 0.36], [[ p, -p, -p], [-p, -p, -p], [-p,  p, -p], [ p,  p, -p]]),
        // +X
        ([0.26, 0.46, 0.82], [[ p, -p,  p], [ p, -p, -p], [ p,  p, -p], [ p,  p,  p]]),
        // -X
        ([0.88, 0.72, 0.26], [[-p, -p, -p], [-p, -p,  p], [-p,  p,  p], [-p,  p, -p]]),
        // +Y
        ([0.60, 0.36, 0.74], [[-p,  p,  p], [ p,  p,  p], [ p,  p, -p], [-p,  p, -p]]),
        // -Y
        ([0.30, 0.68, 0.70], [[-p, -p, -p], [ p, -p, -p], [ p, -p,  p], [-p, -p,  p]]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (face, (color, corners)) in faces.iter().enumerate() {
        let base = (face * 4) as u16;
        for corner in corners {
            vertices.push(SceneVertex {
                position: *corner,
                color: *color,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_four_vertices_and_two_triangles_per_face() {
        let (vertices, indices) = cube_mesh();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|i| (*i as usize) < vertices.len()));
    }

    #[test]
    fn vertex_layout_matches_the_record() {
        assert_eq!(SceneVertex::LAYOUT.array_stride, 24);
        assert_eq!(SceneVertex::LAYOUT.attributes.len(), 2);
    }
}
