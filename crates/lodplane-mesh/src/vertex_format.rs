//! Canonical `wgpu::VertexBufferLayout` for the plane mesh.
//!
//! ## Attribute Packing
//!
//! | Location | Offset | Format    | Field    |
//! |----------|--------|-----------|----------|
//! | 0        | 0      | Float32x3 | position |
//! | 1        | 12     | Unorm8x4  | color    |
//! | 2        | 16     | Float32x2 | uv       |

use std::mem;

use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

use crate::vertex::PlaneVertex;

/// Vertex attributes covering all 24 bytes of [`PlaneVertex`].
pub const PLANE_VERTEX_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    // Packed color word, normalized to [0, 1] per byte
    VertexAttribute {
        format: VertexFormat::Unorm8x4,
        offset: 12,
        shader_location: 1,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 16,
        shader_location: 2,
    },
];

/// The vertex buffer layout used by the plane pipeline.
pub const PLANE_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<PlaneVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &PLANE_VERTEX_ATTRIBUTES,
};

/// Return the plane vertex buffer layout as an owned value.
pub fn plane_vertex_buffer_layout() -> VertexBufferLayout<'static> {
    PLANE_VERTEX_LAYOUT
}

const _: () = assert!(
    mem::size_of::<PlaneVertex>() == 24,
    "PlaneVertex size changed, update PLANE_VERTEX_LAYOUT"
);
const _: () =
    assert!(PLANE_VERTEX_ATTRIBUTES[1].offset == mem::offset_of!(PlaneVertex, color) as u64);
const _: () = assert!(PLANE_VERTEX_ATTRIBUTES[2].offset == mem::offset_of!(PlaneVertex, uv) as u64);

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex_format_size(format: VertexFormat) -> u64 {
        match format {
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x2 => 8,
            VertexFormat::Unorm8x4 => 4,
            _ => panic!("unexpected format {format:?}"),
        }
    }

    #[test]
    fn test_layout_stride_matches_vertex_struct_size() {
        assert_eq!(
            PLANE_VERTEX_LAYOUT.array_stride,
            mem::size_of::<PlaneVertex>() as u64
        );
    }

    #[test]
    fn test_attributes_fit_within_stride() {
        let stride = PLANE_VERTEX_LAYOUT.array_stride;
        for (i, attr) in PLANE_VERTEX_ATTRIBUTES.iter().enumerate() {
            let size = vertex_format_size(attr.format);
            assert!(
                attr.offset + size <= stride,
                "Attribute {i} at offset {} with size {size} exceeds stride {stride}",
                attr.offset,
            );
        }
    }

    #[test]
    fn test_shader_locations_are_sequential() {
        for (i, attr) in PLANE_VERTEX_ATTRIBUTES.iter().enumerate() {
            assert_eq!(attr.shader_location, i as u32);
        }
    }

    #[test]
    fn test_owned_layout_matches_const() {
        let layout = plane_vertex_buffer_layout();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.step_mode, VertexStepMode::Vertex);
        assert_eq!(layout.attributes.len(), 3);
    }
}
