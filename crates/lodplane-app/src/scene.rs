//! Host setup for the harness: plane options from config, tier textures and
//! the animated plasma binding.

use lodplane_config::{ColorBlendMode, Config};
use lodplane_lod::{LodTier, TIER_COUNT, TextureHandle};
use lodplane_mesh::{ColorBlend, MeshBuildOptions};
use lodplane_plugin::{HostError, HostOptions, PluginHost};

/// Handles of the procedural checker textures, indexed by tier.
pub const TIER_TEXTURES: [TextureHandle; TIER_COUNT] =
    [TextureHandle(1), TextureHandle(2), TextureHandle(3)];

/// Handle refilled with plasma every frame.
pub const PLASMA_TEXTURE: TextureHandle = TextureHandle(4);

/// Checker cell edge in texels for a texture of `size`.
const CHECKER_CELLS: u32 = 8;

/// Light checker colour per tier: red for coarse, green for medium, blue for fine.
const TIER_TINTS: [[u8; 3]; TIER_COUNT] = [[230, 120, 110], [120, 220, 130], [120, 150, 235]];

const DARK_TEXEL: [u8; 4] = [40, 40, 40, 255];

pub fn mesh_options(config: &Config) -> MeshBuildOptions {
    MeshBuildOptions {
        max_depth: config.plane.max_depth,
        color_blend: match config.plane.color_blend {
            ColorBlendMode::PackedInteger => ColorBlend::PackedInteger,
            ColorBlendMode::PerChannel => ColorBlend::PerChannel,
        },
    }
}

/// RGBA8 checkerboard for `tier`, `size`×`size` texels.
pub fn checker_texture(tier: LodTier, size: u32) -> Vec<u8> {
    let cell = (size / CHECKER_CELLS).max(1);
    let [r, g, b] = TIER_TINTS[tier.index()];
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            if ((x / cell) + (y / cell)).is_multiple_of(2) {
                data.extend_from_slice(&[r, g, b, 255]);
            } else {
                data.extend_from_slice(&DARK_TEXEL);
            }
        }
    }
    data
}

/// A host with the plane built and every tier bound. The graphics device is
/// announced separately once the renderer exists.
///
/// When `render.plasma_tier` names a tier, that tier shows [`PLASMA_TEXTURE`]
/// instead of its checker.
pub fn build_host(config: &Config) -> Result<PluginHost, HostError> {
    let mut host = PluginHost::new();
    host.init_plugin(HostOptions {
        mesh: mesh_options(config),
        initial_texture: TextureHandle(config.plane.initial_texture),
    })?;

    for (tier, handle) in TIER_TEXTURES.iter().enumerate() {
        host.set_plane_texture(*handle, tier)?;
    }

    if let Some(tier) = config.render.plasma_tier {
        let size = config.render.texture_size;
        host.set_animated_texture(PLASMA_TEXTURE, size, size)?;
        host.set_plane_texture(PLASMA_TEXTURE, tier)?;
    }
    Ok(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_options_follow_config() {
        let mut config = Config::default();
        config.plane.max_depth = 3;
        config.plane.color_blend = ColorBlendMode::PerChannel;
        let options = mesh_options(&config);
        assert_eq!(options.max_depth, 3);
        assert_eq!(options.color_blend, ColorBlend::PerChannel);
    }

    #[test]
    fn test_checker_texture_size_and_pattern() {
        let data = checker_texture(LodTier::Medium, 16);
        assert_eq!(data.len(), 16 * 16 * 4);
        assert_eq!(&data[0..4], &[120, 220, 130, 255]);
        // Cell edge is 2 texels, so texel (2, 0) is dark
        assert_eq!(&data[8..12], &DARK_TEXEL);
    }

    #[test]
    fn test_checker_tiny_texture() {
        assert_eq!(checker_texture(LodTier::Fine, 1), vec![120, 150, 235, 255]);
    }

    #[test]
    fn test_build_host_binds_tiers_and_plasma() {
        let host = build_host(&Config::default()).unwrap();
        assert!(!host.is_ready(), "device is announced by the renderer");
        let plane = host.plane().unwrap();
        assert_eq!(plane.texture_id(0), Ok(PLASMA_TEXTURE));
        assert_eq!(plane.texture_id(1), Ok(TIER_TEXTURES[1]));
        assert_eq!(plane.texture_id(2), Ok(TIER_TEXTURES[2]));
        let animated = host.animated_texture().unwrap();
        assert_eq!((animated.width, animated.height), (256, 256));
    }

    #[test]
    fn test_build_host_without_plasma() {
        let mut config = Config::default();
        config.render.plasma_tier = None;
        let host = build_host(&config).unwrap();
        assert!(host.animated_texture().is_none());
        assert_eq!(host.plane().unwrap().texture_id(0), Ok(TIER_TEXTURES[0]));
    }

    #[test]
    fn test_build_host_rejects_bad_plasma_tier() {
        let mut config = Config::default();
        config.render.plasma_tier = Some(3);
        assert!(build_host(&config).is_err());
    }

    #[test]
    fn test_build_host_rejects_deep_mesh() {
        let mut config = Config::default();
        config.plane.max_depth = 5;
        assert!(matches!(build_host(&config), Err(HostError::Lod(_))));
    }
}
