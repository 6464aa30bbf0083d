//! Level-of-detail selection for the subdivided plane: tier table, distance thresholds,
//! per-tier texture bindings, and the draw seam used by graphics backends.

mod backend;
mod distance;
mod error;
mod plane;
mod texture;
mod tier;

pub use backend::RenderBackend;
pub use distance::{camera_position_from_view, observer_distance};
pub use error::LodError;
pub use plane::LodPlane;
pub use texture::{TextureHandle, TierTextures};
pub use tier::{COARSE_THRESHOLD, FINE_THRESHOLD, LodTier, TIER_COUNT, select_tier};
