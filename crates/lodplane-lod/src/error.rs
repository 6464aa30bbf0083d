//! LOD plane error types.

use lodplane_mesh::MeshError;

use crate::tier::TIER_COUNT;

/// Errors raised by [`LodPlane`](crate::LodPlane) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LodError {
    /// A texture was addressed with a tier outside `0..TIER_COUNT`.
    #[error("LOD tier {tier} out of range (only {} tiers exist)", TIER_COUNT)]
    TierOutOfRange { tier: usize },

    /// The plane mesh could not be built.
    #[error("failed to build plane mesh: {0}")]
    Mesh(#[from] MeshError),
}
