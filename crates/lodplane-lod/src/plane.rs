//! The LOD plane: a subdivided mesh, one texture per tier, and distance-driven drawing.

use std::ops::Range;

use glam::Vec4;
use lodplane_mesh::{MeshBuildOptions, PlaneMesh};

use crate::backend::RenderBackend;
use crate::error::LodError;
use crate::texture::{TextureHandle, TierTextures};
use crate::tier::{LodTier, TIER_COUNT, select_tier};

/// Sampler unit the tier texture is bound to.
const TEXTURE_UNIT: u32 = 0;

/// A plane drawn at one of [`TIER_COUNT`] levels of detail.
///
/// The mesh is built once and never changes. Texture bindings may be replaced
/// at any time.
pub struct LodPlane {
    mesh: PlaneMesh,
    textures: TierTextures,
    tier_ranges: [Range<u32>; TIER_COUNT],
}

impl LodPlane {
    /// Build the plane with the default mesh and `initial` bound to every tier.
    pub fn new(initial: TextureHandle) -> Result<Self, LodError> {
        Self::with_options(MeshBuildOptions::default(), initial)
    }

    /// Build the plane with explicit mesh options.
    pub fn with_options(
        options: MeshBuildOptions,
        initial: TextureHandle,
    ) -> Result<Self, LodError> {
        let mesh = PlaneMesh::build_with(options)?;
        log::debug!(
            "Built LOD plane: depth {}, {} vertices, {} indices",
            mesh.depth(),
            mesh.vertex_count(),
            mesh.index_count()
        );
        Ok(Self::from_mesh(mesh, initial))
    }

    /// Wrap an already built mesh.
    pub fn from_mesh(mesh: PlaneMesh, initial: TextureHandle) -> Self {
        let depth = mesh.depth();
        let tier_ranges = LodTier::ALL.map(|tier| {
            let range = lodplane_mesh::level_range(tier.mesh_level(depth));
            range.start as u32..range.end as u32
        });
        Self {
            mesh,
            textures: TierTextures::new(initial),
            tier_ranges,
        }
    }

    /// Replace the texture bound to `tier`.
    pub fn set_texture_id(&mut self, texture: TextureHandle, tier: usize) -> Result<(), LodError> {
        self.textures.set(texture, tier)
    }

    /// Texture bound to `tier`.
    pub fn texture_id(&self, tier: usize) -> Result<TextureHandle, LodError> {
        self.textures.get(tier)
    }

    /// Mean position of the root quad's corners, with `w = 1`.
    pub fn centroid(&self) -> Vec4 {
        self.mesh.root_centroid().extend(1.0)
    }

    /// Index range drawn for `tier`.
    pub fn tier_range(&self, tier: LodTier) -> Range<u32> {
        self.tier_ranges[tier.index()].clone()
    }

    /// The underlying mesh.
    pub fn mesh(&self) -> &PlaneMesh {
        &self.mesh
    }

    /// Draw the tier selected for `distance_to_observer`. Returns the tier drawn.
    pub fn render(
        &self,
        distance_to_observer: f32,
        backend: &mut impl RenderBackend,
    ) -> LodTier {
        let tier = select_tier(distance_to_observer);
        let texture = self.textures.for_tier(tier);
        log::trace!(
            "Drawing tier {:?} at distance {distance_to_observer:.3} with texture {}",
            tier,
            texture.raw()
        );

        backend.bind_mesh(&self.mesh);
        backend.bind_texture(TEXTURE_UNIT, texture);
        backend.draw_indexed(self.tier_range(tier));
        tier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodplane_mesh::ColorBlend;

    #[derive(Debug, PartialEq)]
    enum Call {
        BindMesh { vertices: usize },
        BindTexture { unit: u32, texture: TextureHandle },
        Draw(Range<u32>),
    }

    #[derive(Default)]
    struct RecordingBackend {
        calls: Vec<Call>,
    }

    impl RenderBackend for RecordingBackend {
        fn bind_mesh(&mut self, mesh: &PlaneMesh) {
            self.calls.push(Call::BindMesh {
                vertices: mesh.vertex_count(),
            });
        }

        fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
            self.calls.push(Call::BindTexture { unit, texture });
        }

        fn draw_indexed(&mut self, indices: Range<u32>) {
            self.calls.push(Call::Draw(indices));
        }
    }

    fn drawn_range(plane: &LodPlane, distance: f32) -> Range<u32> {
        let mut backend = RecordingBackend::default();
        plane.render(distance, &mut backend);
        match backend.calls.last() {
            Some(Call::Draw(range)) => range.clone(),
            other => panic!("expected a draw call, got {other:?}"),
        }
    }

    fn textured_plane() -> LodPlane {
        let mut plane = LodPlane::new(TextureHandle(9)).unwrap();
        plane.set_texture_id(TextureHandle(10), 0).unwrap();
        plane.set_texture_id(TextureHandle(11), 1).unwrap();
        plane.set_texture_id(TextureHandle(12), 2).unwrap();
        plane
    }

    #[test]
    fn test_tier_ranges_match_table() {
        let plane = LodPlane::new(TextureHandle::NONE).unwrap();
        assert_eq!(plane.tier_range(LodTier::Coarse), 0..6);
        assert_eq!(plane.tier_range(LodTier::Medium), 6..30);
        assert_eq!(plane.tier_range(LodTier::Fine), 30..126);
    }

    #[test]
    fn test_render_selects_tier_by_distance() {
        let plane = textured_plane();
        assert_eq!(drawn_range(&plane, 3.5), 0..6);
        assert_eq!(drawn_range(&plane, 2.5), 6..30);
        assert_eq!(drawn_range(&plane, 1.0), 30..126);
    }

    #[test]
    fn test_render_boundaries() {
        let plane = textured_plane();
        let mut backend = RecordingBackend::default();
        assert_eq!(plane.render(3.0, &mut backend), LodTier::Medium);
        assert_eq!(plane.render(2.0, &mut backend), LodTier::Fine);
    }

    #[test]
    fn test_render_issues_one_frame_of_commands() {
        let plane = textured_plane();
        let mut backend = RecordingBackend::default();
        let tier = plane.render(2.5, &mut backend);

        assert_eq!(tier, LodTier::Medium);
        assert_eq!(
            backend.calls,
            vec![
                Call::BindMesh { vertices: 29 },
                Call::BindTexture {
                    unit: 0,
                    texture: TextureHandle(11)
                },
                Call::Draw(6..30),
            ]
        );
    }

    #[test]
    fn test_each_tier_binds_its_own_texture() {
        let plane = textured_plane();
        for (distance, expected) in [(5.0, 10), (2.5, 11), (0.5, 12)] {
            let mut backend = RecordingBackend::default();
            plane.render(distance, &mut backend);
            assert!(backend.calls.contains(&Call::BindTexture {
                unit: 0,
                texture: TextureHandle(expected)
            }));
        }
    }

    #[test]
    fn test_set_texture_id_roundtrip() {
        let mut plane = LodPlane::new(TextureHandle::NONE).unwrap();
        plane.set_texture_id(TextureHandle(77), 1).unwrap();
        assert_eq!(plane.texture_id(1), Ok(TextureHandle(77)));
        assert_eq!(plane.texture_id(0), Ok(TextureHandle::NONE));
    }

    #[test]
    fn test_set_texture_id_rejects_tier_three() {
        let mut plane = LodPlane::new(TextureHandle::NONE).unwrap();
        assert_eq!(
            plane.set_texture_id(TextureHandle(1), 3),
            Err(LodError::TierOutOfRange { tier: 3 })
        );
    }

    #[test]
    fn test_centroid_of_root_corners() {
        let plane = LodPlane::new(TextureHandle::NONE).unwrap();
        assert_eq!(plane.centroid(), Vec4::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn test_deeper_mesh_draws_deepest_level_as_fine() {
        let plane = LodPlane::with_options(
            MeshBuildOptions {
                max_depth: 3,
                color_blend: ColorBlend::PerChannel,
            },
            TextureHandle::NONE,
        )
        .unwrap();
        assert_eq!(plane.tier_range(LodTier::Medium), 6..30);
        assert_eq!(plane.tier_range(LodTier::Fine), 126..510);
    }

    #[test]
    fn test_unbuildable_depth_is_reported() {
        let result = LodPlane::with_options(
            MeshBuildOptions {
                max_depth: 9,
                ..Default::default()
            },
            TextureHandle::NONE,
        );
        assert!(matches!(result, Err(LodError::Mesh(_))));
    }
}
