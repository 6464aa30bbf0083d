//! Vertex and index buffer upload for the plane mesh.
//!
//! The mesh stores 8-bit indices. wgpu has no 8-bit index format, so indices
//! are widened to `u16` on upload. Index ranges stay the same.

use std::ops::Range;

use lodplane_mesh::PlaneMesh;

/// Plane mesh resident on the GPU.
pub struct PlaneMeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl PlaneMeshBuffer {
    pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint16;

    /// Bind vertex and index buffers to a render pass.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), Self::INDEX_FORMAT);
    }

    /// Draw a sub-range of the index buffer. Ranges past the end are clamped.
    pub fn draw_range(&self, render_pass: &mut wgpu::RenderPass<'_>, indices: Range<u32>) {
        let end = indices.end.min(self.index_count);
        let start = indices.start.min(end);
        render_pass.draw_indexed(start..end, 0, 0..1);
    }

    /// Whether this buffer was uploaded from a mesh shaped like `mesh`.
    pub fn matches(&self, mesh: &PlaneMesh) -> bool {
        self.vertex_count as usize == mesh.vertex_count()
            && self.index_count as usize == mesh.index_count()
    }
}

/// Widen 8-bit mesh indices to the narrowest format wgpu accepts.
pub fn widen_indices(indices: &[u8]) -> Vec<u16> {
    indices.iter().copied().map(u16::from).collect()
}

/// GPU buffer allocator for creating vertex and index buffers.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload `mesh` in full. Tiers are drawn as sub-ranges of this one buffer.
    pub fn create_plane_mesh(&self, label: &str, mesh: &PlaneMesh) -> PlaneMeshBuffer {
        let vertex_buffer =
            self.create_vertex_buffer(&format!("{label}-vertices"), mesh.vertex_bytes());
        let indices = widen_indices(mesh.indices());
        let index_buffer = self.create_index_buffer_u16(&format!("{label}-indices"), &indices);

        log::debug!(
            "Uploaded plane mesh '{label}': {} vertices, {} indices",
            mesh.vertex_count(),
            indices.len()
        );

        PlaneMeshBuffer {
            vertex_buffer,
            index_buffer,
            vertex_count: mesh.vertex_count() as u32,
            index_count: indices.len() as u32,
        }
    }

    /// Create a vertex buffer from raw byte data.
    pub fn create_vertex_buffer(&self, label: &str, data: &[u8]) -> wgpu::Buffer {
        use wgpu::util::DeviceExt;

        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
    }

    /// Create a u16 index buffer.
    pub fn create_index_buffer_u16(&self, label: &str, data: &[u16]) -> wgpu::Buffer {
        use wgpu::util::DeviceExt;

        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            })
    }
}
