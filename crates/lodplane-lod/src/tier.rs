//! Distance-based tier selection with fixed thresholds.

/// Number of LOD tiers.
pub const TIER_COUNT: usize = 3;

/// Beyond this distance the coarse tier is drawn.
pub const COARSE_THRESHOLD: f32 = 3.0;

/// Beyond this distance (and up to [`COARSE_THRESHOLD`]) the medium tier is drawn.
pub const FINE_THRESHOLD: f32 = 2.0;

/// One discrete level of detail. Every tier covers the whole plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LodTier {
    /// The root quad alone.
    Coarse = 0,
    /// The root's four children.
    Medium = 1,
    /// The deepest subdivision level.
    Fine = 2,
}

impl LodTier {
    /// All tiers, coarsest first.
    pub const ALL: [LodTier; TIER_COUNT] = [LodTier::Coarse, LodTier::Medium, LodTier::Fine];

    /// Position of this tier in the tier table.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look a tier up by table position.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Mesh subdivision level drawn for this tier on a mesh of `depth` levels.
    pub fn mesh_level(self, depth: u8) -> u8 {
        match self {
            LodTier::Coarse => 0,
            LodTier::Medium => depth.min(1),
            LodTier::Fine => depth,
        }
    }
}

/// Pick the tier to draw for an observer at `distance`.
///
/// Boundaries are exclusive on the far side: exactly 3.0 is medium, exactly
/// 2.0 is fine. There is no hysteresis, so a distance oscillating across a
/// threshold switches tiers every frame. NaN selects the fine tier.
pub fn select_tier(distance: f32) -> LodTier {
    if distance > COARSE_THRESHOLD {
        LodTier::Coarse
    } else if distance > FINE_THRESHOLD {
        LodTier::Medium
    } else {
        LodTier::Fine
    }
}
