//! Mesh construction error types.

use crate::plane_mesh::MAX_VERTICES;

/// Errors raised while building or subdividing a plane mesh.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    /// The offset does not name a complete 6-index quad block.
    #[error("quad block at index offset {offset} exceeds index count {index_count}")]
    QuadOutOfRange { offset: usize, index_count: usize },

    /// Appending vertices would push an index past the 8-bit ceiling.
    #[error(
        "mesh would hold {vertex_count} vertices, more than the {} an 8-bit index can address",
        MAX_VERTICES
    )]
    IndexOverflow { vertex_count: usize },

    /// The requested depth cannot be built within the 8-bit index ceiling.
    #[error("subdivision depth {depth} exceeds the supported maximum {max}")]
    DepthTooLarge { depth: u8, max: u8 },
}
