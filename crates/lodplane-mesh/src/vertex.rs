//! Packed plane vertex: position, RGBA color word, and texture coordinate.

use bytemuck::{Pod, Zeroable};

/// A single vertex of the plane mesh.
///
/// The color is one 32-bit word whose bytes, in memory order, are read by the
/// GPU as normalized RGBA.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PlaneVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Packed color, one byte per channel.
    pub color: u32,
    /// Texture coordinate.
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(PlaneVertex, [u8; 24]);

impl PlaneVertex {
    /// Create a vertex from its components.
    pub const fn new(position: [f32; 3], color: u32, uv: [f32; 2]) -> Self {
        Self {
            position,
            color,
            uv,
        }
    }

    /// Position as a glam vector.
    pub fn position_vec3(&self) -> glam::Vec3 {
        glam::Vec3::from_array(self.position)
    }

    /// Color bytes in memory order (the order the GPU reads them).
    pub fn color_bytes(&self) -> [u8; 4] {
        self.color.to_ne_bytes()
    }
}
