use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Mesh vertex: position, normal, texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x2  // texcoord
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Unit quad in the XY plane: corners at (±1, ±1, 0), +Z normals, texture
/// coordinates 0..1 with v = 0 at the bottom edge.
const QUAD_VERTICES: [Vertex; 4] = [
    Vertex { position: [-1.0, -1.0, 0.0], normal: [0.0, 0.0, 1.0], texcoord: [0.0, 0.0] },
    Vertex { position: [1.0, -1.0, 0.0], normal: [0.0, 0.0, 1.0], texcoord: [1.0, 0.0] },
    Vertex { position: [1.0, 1.0, 0.0], normal: [0.0, 0.0, 1.0], texcoord: [1.0, 1.0] },
    Vertex { position: [-1.0, 1.0, 0.0], normal: [0.0, 0.0, 1.0], texcoord: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Quadrilateral primitive resident on the GPU.
///
/// Buffers are released when the value is dropped.
pub struct QuadMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

impl QuadMesh {
    /// Uploads the unit quad and returns its handle.
    pub fn generate(device: &wgpu::Device) -> Self {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("girouette quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("girouette quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vbo,
            ibo,
            index_count: QUAD_INDICES.len() as u32,
        }
    }

    /// Binds the quad's buffers and issues the indexed draw.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vbo.slice(..));
        rpass.set_index_buffer(self.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_stride_is_packed() {
        // 3 + 3 + 2 floats, no padding.
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn quad_spans_unit_square() {
        for v in &QUAD_VERTICES {
            assert!(v.position[0].abs() == 1.0 && v.position[1].abs() == 1.0);
            assert_eq!(v.position[2], 0.0);
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn quad_indices_form_two_ccw_triangles() {
        assert_eq!(QUAD_INDICES.len(), 6);
        for &i in &QUAD_INDICES {
            assert!((i as usize) < QUAD_VERTICES.len());
        }
    }

    #[test]
    fn texcoords_cover_unit_range() {
        for v in &QUAD_VERTICES {
            assert!((0.0..=1.0).contains(&v.texcoord[0]));
            assert!((0.0..=1.0).contains(&v.texcoord[1]));
        }
    }
}
