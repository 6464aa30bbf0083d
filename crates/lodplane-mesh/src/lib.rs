//! Plane mesh construction: packed vertices, quad subdivision, and the per-level index layout.

pub mod color;
pub mod error;
pub mod plane_mesh;
pub mod vertex;
pub mod vertex_format;

pub use color::{ColorBlend, MIDPOINT_COLOR, average_packed, average_per_channel};
pub use error::MeshError;
pub use plane_mesh::{
    CHILDREN_PER_QUAD, DEFAULT_MAX_DEPTH, INDICES_PER_QUAD, MAX_VERTICES, MeshBuildOptions,
    PlaneMesh, ROOT_QUAD, VERTICES_PER_SUBDIVISION, expected_index_count, expected_vertex_count,
    level_range, max_supported_depth,
};
pub use vertex::PlaneVertex;
pub use vertex_format::{PLANE_VERTEX_ATTRIBUTES, PLANE_VERTEX_LAYOUT, plane_vertex_buffer_layout};
