//! The draw seam between [`LodPlane`](crate::LodPlane) and a graphics API.

use std::ops::Range;

use lodplane_mesh::PlaneMesh;

use crate::texture::TextureHandle;

/// Receives the draw commands for one frame of the plane.
///
/// A frame is always `bind_mesh`, `bind_texture`, `draw_indexed`, in that order.
pub trait RenderBackend {
    /// Bind the mesh's packed vertex buffer and its vertex attributes.
    fn bind_mesh(&mut self, mesh: &PlaneMesh);

    /// Bind `texture` to sampler unit `unit`.
    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    /// Draw triangles from the given range of the mesh's index buffer.
    fn draw_indexed(&mut self, indices: Range<u32>);
}
