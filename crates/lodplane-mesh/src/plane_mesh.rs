//! Multi-resolution plane mesh built by recursive quad subdivision.
//!
//! The mesh starts as a single quad (4 vertices, 2 triangles). Each
//! subdivision of a quad appends a centroid and four edge midpoints, then
//! appends four child quads. Parent indices are never rewritten, so the index
//! buffer ends up as a sequence of whole-plane levels laid out back to back:
//!
//! | Level | Quads | Index range (depth 2) |
//! |-------|-------|-----------------------|
//! | 0     | 1     | `0..6`                |
//! | 1     | 4     | `6..30`               |
//! | 2     | 16    | `30..126`             |
//!
//! Indices are `u8`, which caps the mesh at [`MAX_VERTICES`] vertices.

use std::ops::Range;

use crate::color::{ColorBlend, MIDPOINT_COLOR};
use crate::error::MeshError;
use crate::vertex::PlaneVertex;

/// Largest vertex count addressable by an 8-bit index.
pub const MAX_VERTICES: usize = u8::MAX as usize + 1;

/// Indices per quad (two triangles).
pub const INDICES_PER_QUAD: usize = 6;

/// Vertices appended by one subdivision: a centroid plus four edge midpoints.
pub const VERTICES_PER_SUBDIVISION: usize = 5;

/// Quadtree fan-out.
pub const CHILDREN_PER_QUAD: usize = 4;

/// Subdivision depth used when none is configured.
pub const DEFAULT_MAX_DEPTH: u8 = 2;

/// Positions inside a 6-index quad block holding the four corners, in cyclic order.
///
/// A block is written as `{c2, c1, c0}, {c3, c2, c0}`.
const CORNER_SLOTS: [usize; 4] = [2, 1, 0, 3];

/// Corners of the root quad.
pub const ROOT_QUAD: [PlaneVertex; 4] = [
    PlaneVertex::new([-1.5, 1.0, -1.5], 0xFFFF_0000, [0.0, 0.0]),
    PlaneVertex::new([1.5, 1.0, -1.5], 0xFF00_FF00, [1.0, 0.0]),
    PlaneVertex::new([1.5, 1.0, 1.5], 0xFF00_00FF, [1.0, 1.0]),
    PlaneVertex::new([-1.5, 1.0, 1.5], 0xFF0F_0F0F, [0.0, 1.0]),
];

/// Options controlling how a [`PlaneMesh`] is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshBuildOptions {
    /// Number of subdivision levels below the root quad.
    pub max_depth: u8,
    /// How centroid colors are averaged.
    pub color_blend: ColorBlend,
}

impl Default for MeshBuildOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            color_blend: ColorBlend::default(),
        }
    }
}

/// Vertex count of a mesh subdivided to `depth` levels.
pub const fn expected_vertex_count(depth: u8) -> usize {
    4 + VERTICES_PER_SUBDIVISION * quads_above(depth)
}

/// Index count of a mesh subdivided to `depth` levels.
pub const fn expected_index_count(depth: u8) -> usize {
    INDICES_PER_QUAD * quads_above(depth + 1)
}

/// Deepest level that still fits within [`MAX_VERTICES`].
pub const fn max_supported_depth() -> u8 {
    let mut depth = 0u8;
    while expected_vertex_count(depth + 1) <= MAX_VERTICES {
        depth += 1;
    }
    depth
}

/// Index range occupied by every quad of `level`.
pub const fn level_range(level: u8) -> Range<usize> {
    let start = INDICES_PER_QUAD * quads_above(level);
    start..start + INDICES_PER_QUAD * quads_at(level)
}

/// Quads on a single level: `4^level`.
const fn quads_at(level: u8) -> usize {
    1 << (2 * level as u32)
}

/// Quads on every level strictly above `level`: `(4^level - 1) / 3`.
const fn quads_above(level: u8) -> usize {
    (quads_at(level) - 1) / 3
}

/// Vertex and 8-bit index buffers for the subdivided plane.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneMesh {
    vertices: Vec<PlaneVertex>,
    indices: Vec<u8>,
    color_blend: ColorBlend,
    depth: u8,
}

impl PlaneMesh {
    /// Build the fixed plane with the default depth and color blend.
    pub fn build() -> Result<Self, MeshError> {
        Self::build_with(MeshBuildOptions::default())
    }

    /// Build the fixed plane with explicit options.
    pub fn build_with(options: MeshBuildOptions) -> Result<Self, MeshError> {
        Self::build_from_root(ROOT_QUAD, options)
    }

    /// Build a plane subdivided from arbitrary root corners.
    ///
    /// Corners must be given in cyclic order around the quad.
    pub fn build_from_root(
        corners: [PlaneVertex; 4],
        options: MeshBuildOptions,
    ) -> Result<Self, MeshError> {
        let max = max_supported_depth();
        if options.max_depth > max {
            return Err(MeshError::DepthTooLarge {
                depth: options.max_depth,
                max,
            });
        }

        let mut mesh = Self::from_root(corners, options.color_blend);
        for level in 0..options.max_depth {
            for offset in level_range(level).step_by(INDICES_PER_QUAD) {
                mesh.subdivide_plane(offset)?;
            }
            mesh.depth = level + 1;
        }
        Ok(mesh)
    }

    /// A single-quad mesh with no subdivision.
    pub fn from_root(corners: [PlaneVertex; 4], color_blend: ColorBlend) -> Self {
        Self {
            vertices: corners.to_vec(),
            indices: vec![2, 1, 0, 3, 2, 0],
            color_blend,
            depth: 0,
        }
    }

    /// Subdivide the quad whose 6-index block starts at `first_index`.
    ///
    /// Appends 5 vertices and 24 indices; nothing already in the buffers is
    /// touched. Returns the offset of the first appended index.
    pub fn subdivide_plane(&mut self, first_index: usize) -> Result<usize, MeshError> {
        if first_index + INDICES_PER_QUAD > self.indices.len() {
            return Err(MeshError::QuadOutOfRange {
                offset: first_index,
                index_count: self.indices.len(),
            });
        }
        let vertex_count = self.vertices.len() + VERTICES_PER_SUBDIVISION;
        if vertex_count > MAX_VERTICES {
            return Err(MeshError::IndexOverflow { vertex_count });
        }

        let corner_indices = CORNER_SLOTS.map(|slot| self.indices[first_index + slot]);
        let corners = corner_indices.map(|i| self.vertices[usize::from(i)]);

        let centroid = self.push_vertex(centroid_vertex(&corners, self.color_blend));
        let mut mids = [0u8; 4];
        for (i, mid) in mids.iter_mut().enumerate() {
            *mid = self.push_vertex(midpoint_vertex(&corners[i], &corners[(i + 1) % 4]));
        }

        let [p0, p1, p2, p3] = corner_indices;
        let [m0, m1, m2, m3] = mids;
        let c = centroid;
        let appended_at = self.indices.len();
        #[rustfmt::skip]
        let children = [
            c,  m0, p0,   m3, c,  p0,
            m1, p1, m0,   c,  m1, m0,
            p2, m1, c,    m2, p2, c,
            m2, c,  m3,   p3, m2, m3,
        ];
        self.indices.extend_from_slice(&children);
        Ok(appended_at)
    }

    fn push_vertex(&mut self, vertex: PlaneVertex) -> u8 {
        self.vertices.push(vertex);
        // Bounded by the MAX_VERTICES check in subdivide_plane.
        (self.vertices.len() - 1) as u8
    }

    /// All vertices in insertion order.
    pub fn vertices(&self) -> &[PlaneVertex] {
        &self.vertices
    }

    /// All indices in insertion order.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of complete subdivision levels below the root.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Color blend strategy used for centroids.
    pub fn color_blend(&self) -> ColorBlend {
        self.color_blend
    }

    /// Index range drawn for `level`, or `None` if the mesh is not that deep.
    pub fn level_indices(&self, level: u8) -> Option<Range<usize>> {
        (level <= self.depth).then(|| level_range(level))
    }

    /// The four root corners.
    pub fn root_corners(&self) -> &[PlaneVertex] {
        &self.vertices[..4]
    }

    /// Mean position of the four root corners.
    pub fn root_centroid(&self) -> glam::Vec3 {
        self.root_corners()
            .iter()
            .map(PlaneVertex::position_vec3)
            .sum::<glam::Vec3>()
            / 4.0
    }

    /// Vertex buffer contents.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

fn centroid_vertex(corners: &[PlaneVertex; 4], blend: ColorBlend) -> PlaneVertex {
    let mut position = [0.0f32; 3];
    let mut uv = [0.0f32; 2];
    for corner in corners {
        for (acc, v) in position.iter_mut().zip(corner.position) {
            *acc += v;
        }
        for (acc, v) in uv.iter_mut().zip(corner.uv) {
            *acc += v;
        }
    }
    PlaneVertex::new(
        position.map(|v| v / 4.0),
        blend.average(corners.map(|c| c.color)),
        uv.map(|v| v / 4.0),
    )
}

fn midpoint_vertex(a: &PlaneVertex, b: &PlaneVertex) -> PlaneVertex {
    PlaneVertex::new(
        [
            (a.position[0] + b.position[0]) / 2.0,
            (a.position[1] + b.position[1]) / 2.0,
            (a.position[2] + b.position[2]) / 2.0,
        ],
        MIDPOINT_COLOR,
        [(a.uv[0] + b.uv[0]) / 2.0, (a.uv[1] + b.uv[1]) / 2.0],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f32) -> [PlaneVertex; 4] {
        [
            PlaneVertex::new([0.0, 0.0, 0.0], 0xFF00_0000, [0.0, 0.0]),
            PlaneVertex::new([size, 0.0, 0.0], 0xFF00_0000, [1.0, 0.0]),
            PlaneVertex::new([size, 0.0, size], 0xFF00_0000, [1.0, 1.0]),
            PlaneVertex::new([0.0, 0.0, size], 0xFF00_0000, [0.0, 1.0]),
        ]
    }

    /// Corners of the quad stored at `offset`, in cyclic order.
    fn quad_corners(mesh: &PlaneMesh, offset: usize) -> [PlaneVertex; 4] {
        CORNER_SLOTS.map(|s| mesh.vertices()[usize::from(mesh.indices()[offset + s])])
    }

    fn quad_area_xz(corners: &[PlaneVertex; 4]) -> f32 {
        // Shoelace formula over the x/z plane.
        let mut twice = 0.0;
        for i in 0..4 {
            let a = corners[i].position;
            let b = corners[(i + 1) % 4].position;
            twice += a[0] * b[2] - b[0] * a[2];
        }
        (twice / 2.0).abs()
    }

    #[test]
    fn test_root_quad_layout() {
        let mesh = PlaneMesh::from_root(ROOT_QUAD, ColorBlend::PackedInteger);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices(), &[2, 1, 0, 3, 2, 0]);
        assert_eq!(mesh.depth(), 0);
    }

    #[test]
    fn test_subdivide_root_appends_five_vertices_and_24_indices() {
        let mut mesh = PlaneMesh::from_root(ROOT_QUAD, ColorBlend::PackedInteger);
        let before_vertices = mesh.vertices().to_vec();
        let before_indices = mesh.indices().to_vec();

        let appended_at = mesh.subdivide_plane(0).unwrap();

        assert_eq!(appended_at, 6);
        assert_eq!(mesh.vertex_count(), 4 + 5);
        assert_eq!(mesh.index_count(), 6 + 24);
        assert_eq!(&mesh.vertices()[..4], before_vertices.as_slice());
        assert_eq!(&mesh.indices()[..6], before_indices.as_slice());
    }

    #[test]
    fn test_centroid_is_exact_mean() {
        let mut mesh = PlaneMesh::from_root(square(2.0), ColorBlend::PackedInteger);
        mesh.subdivide_plane(0).unwrap();
        let centroid = mesh.vertices()[4];
        assert_eq!(centroid.position, [1.0, 0.0, 1.0]);
        assert_eq!(centroid.uv, [0.5, 0.5]);
    }

    #[test]
    fn test_midpoints_follow_edge_order_and_are_white() {
        let mut mesh = PlaneMesh::from_root(square(2.0), ColorBlend::PackedInteger);
        mesh.subdivide_plane(0).unwrap();
        let mids: Vec<[f32; 3]> = mesh.vertices()[5..9].iter().map(|v| v.position).collect();
        assert_eq!(
            mids,
            vec![
                [1.0, 0.0, 0.0],
                [2.0, 0.0, 1.0],
                [1.0, 0.0, 2.0],
                [0.0, 0.0, 1.0],
            ]
        );
        assert!(mesh.vertices()[5..9].iter().all(|v| v.color == MIDPOINT_COLOR));
        assert_eq!(mesh.vertices()[5].uv, [0.5, 0.0]);
    }

    #[test]
    fn test_centroid_color_uses_packed_average() {
        let mut mesh = PlaneMesh::from_root(ROOT_QUAD, ColorBlend::PackedInteger);
        mesh.subdivide_plane(0).unwrap();
        let expected = crate::color::average_packed(ROOT_QUAD.map(|v| v.color));
        assert_eq!(mesh.vertices()[4].color, expected);
    }

    #[test]
    fn test_centroid_color_per_channel() {
        let mut mesh = PlaneMesh::from_root(ROOT_QUAD, ColorBlend::PerChannel);
        mesh.subdivide_plane(0).unwrap();
        let expected = crate::color::average_per_channel(ROOT_QUAD.map(|v| v.color));
        assert_eq!(mesh.vertices()[4].color, expected);
    }

    #[test]
    fn test_children_tile_the_parent() {
        let mut mesh = PlaneMesh::from_root(square(2.0), ColorBlend::PackedInteger);
        mesh.subdivide_plane(0).unwrap();
        let parent_area = quad_area_xz(&quad_corners(&mesh, 0));
        let child_area: f32 = (0..4)
            .map(|q| quad_area_xz(&quad_corners(&mesh, 6 + q * INDICES_PER_QUAD)))
            .sum();
        assert!((parent_area - 4.0).abs() < 1e-6);
        assert!((child_area - parent_area).abs() < 1e-6);
        for q in 0..4 {
            let area = quad_area_xz(&quad_corners(&mesh, 6 + q * INDICES_PER_QUAD));
            assert!((area - 1.0).abs() < 1e-6, "child {q} area {area}");
        }
    }

    #[test]
    fn test_child_blocks_keep_root_winding() {
        // Every block must be {c2, c1, c0}, {c3, c2, c0} so it can be subdivided again.
        let mesh = PlaneMesh::build().unwrap();
        for offset in (0..mesh.index_count()).step_by(INDICES_PER_QUAD) {
            let b = &mesh.indices()[offset..offset + INDICES_PER_QUAD];
            assert_eq!(b[4], b[0], "block at {offset}");
            assert_eq!(b[5], b[2], "block at {offset}");
        }
    }

    #[test]
    fn test_subdivide_out_of_range() {
        let mut mesh = PlaneMesh::from_root(ROOT_QUAD, ColorBlend::PackedInteger);
        let err = mesh.subdivide_plane(6).unwrap_err();
        assert_eq!(
            err,
            MeshError::QuadOutOfRange {
                offset: 6,
                index_count: 6
            }
        );
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn test_subdivide_rejects_index_overflow_without_mutating() {
        let mut mesh = PlaneMesh::build_with(MeshBuildOptions {
            max_depth: max_supported_depth(),
            ..Default::default()
        })
        .unwrap();
        let mut result = Ok(0);
        while result.is_ok() {
            result = mesh.subdivide_plane(0);
        }
        let vertices = mesh.vertex_count();
        assert!(vertices <= MAX_VERTICES);
        assert!(matches!(result, Err(MeshError::IndexOverflow { .. })));
        assert!(mesh.subdivide_plane(0).is_err());
        assert_eq!(mesh.vertex_count(), vertices);
    }

    #[test]
    fn test_default_build_matches_tier_table() {
        let mesh = PlaneMesh::build().unwrap();
        assert_eq!(mesh.depth(), 2);
        assert_eq!(mesh.index_count(), 126);
        assert_eq!(mesh.vertex_count(), 4 + 5 * 5);
        assert!(mesh.vertex_count() <= MAX_VERTICES);
        assert_eq!(mesh.level_indices(0), Some(0..6));
        assert_eq!(mesh.level_indices(1), Some(6..30));
        assert_eq!(mesh.level_indices(2), Some(30..126));
        assert_eq!(mesh.level_indices(3), None);
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = PlaneMesh::build().unwrap();
        let b = PlaneMesh::build().unwrap();
        assert_eq!(a.vertex_bytes(), b.vertex_bytes());
        assert_eq!(a.indices(), b.indices());
    }

    #[test]
    fn test_build_matches_hand_unrolled_subdivision() {
        let mut manual = PlaneMesh::from_root(ROOT_QUAD, ColorBlend::PackedInteger);
        for offset in [0, 6, 12, 18, 24] {
            manual.subdivide_plane(offset).unwrap();
        }
        let built = PlaneMesh::build().unwrap();
        assert_eq!(built.vertices(), manual.vertices());
        assert_eq!(built.indices(), manual.indices());
    }

    #[test]
    fn test_depth_bounds() {
        assert_eq!(max_supported_depth(), 3);
        assert_eq!(expected_vertex_count(3), 109);
        assert!(expected_vertex_count(4) > MAX_VERTICES);

        let deep = PlaneMesh::build_with(MeshBuildOptions {
            max_depth: 3,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(deep.vertex_count(), expected_vertex_count(3));
        assert_eq!(deep.index_count(), expected_index_count(3));

        let err = PlaneMesh::build_with(MeshBuildOptions {
            max_depth: 4,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, MeshError::DepthTooLarge { depth: 4, max: 3 });
    }

    #[test]
    fn test_level_ranges_are_contiguous() {
        assert_eq!(level_range(0), 0..6);
        assert_eq!(level_range(1), 6..30);
        assert_eq!(level_range(2), 30..126);
        assert_eq!(level_range(3), 126..510);
        for level in 0..3 {
            assert_eq!(level_range(level).end, level_range(level + 1).start);
        }
    }

    #[test]
    fn test_root_centroid() {
        let mesh = PlaneMesh::build().unwrap();
        assert_eq!(mesh.root_centroid(), glam::Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_every_index_addresses_a_vertex() {
        let mesh = PlaneMesh::build().unwrap();
        assert!(
            mesh.indices()
                .iter()
                .all(|&i| usize::from(i) < mesh.vertex_count())
        );
    }
}
