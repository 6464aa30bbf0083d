//! Opaque texture handles and the per-tier binding table.

use crate::error::LodError;
use crate::tier::{LodTier, TIER_COUNT};

/// A host-owned texture, referenced by integer handle only.
///
/// The plane never creates or destroys the texture behind a handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    /// The handle every tier starts with unless the host provides another.
    pub const NONE: TextureHandle = TextureHandle(0);

    /// Raw handle value.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for TextureHandle {
    fn from(raw: u32) -> Self {
        TextureHandle(raw)
    }
}

/// One texture handle per tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierTextures {
    handles: [TextureHandle; TIER_COUNT],
}

impl TierTextures {
    /// Bind `initial` to every tier.
    pub fn new(initial: TextureHandle) -> Self {
        Self {
            handles: [initial; TIER_COUNT],
        }
    }

    /// Replace the texture bound to `tier`.
    pub fn set(&mut self, handle: TextureHandle, tier: usize) -> Result<(), LodError> {
        let slot = self
            .handles
            .get_mut(tier)
            .ok_or(LodError::TierOutOfRange { tier })?;
        *slot = handle;
        Ok(())
    }

    /// Texture bound to `tier`.
    pub fn get(&self, tier: usize) -> Result<TextureHandle, LodError> {
        self.handles
            .get(tier)
            .copied()
            .ok_or(LodError::TierOutOfRange { tier })
    }

    /// Texture bound to a tier known to exist.
    pub fn for_tier(&self, tier: LodTier) -> TextureHandle {
        self.handles[tier.index()]
    }
}

impl Default for TierTextures {
    fn default() -> Self {
        Self::new(TextureHandle::NONE)
    }
}
