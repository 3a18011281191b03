use bevy_log::prelude::*;
use bevy_math::Vec3;
use web_time::Instant;

use crate::{common::triangle::Triangle, error::GeodesicError, render_mesh::RenderMesh};

pub mod seed;

/// More subdivisions overflow the 65,535 indices of a single 16-bit mesh.
pub const MAX_SUBDIVISIONS: u8 = 5;

/// One layout of the mesh: a flat vertex list plus triangles owning their corners.
///
/// Every corner of every triangle also appears in `vertices`.
#[derive(Debug, Clone, Default)]
pub struct MeshVariant {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<Triangle>,
}

impl MeshVariant {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        let triangles = seed::base_triangles(&vertices);
        Self {
            vertices,
            triangles,
        }
    }

    /// Replaces every triangle by its four children and appends the new
    /// midpoints to the vertex list, three per parent in traversal order.
    pub fn subdivide(&mut self, normalize: bool) {
        let mut triangles = Vec::with_capacity(self.triangles.len() * 4);
        self.vertices.reserve(self.triangles.len() * 3);

        for triangle in &self.triangles {
            self.vertices.extend(triangle.midpoints(normalize));
            triangles.extend(triangle.subdivide(normalize));
        }

        self.triangles = triangles;
    }

    pub fn to_render_mesh(&self) -> Result<RenderMesh, GeodesicError> {
        RenderMesh::from_variant(self)
    }
}

/// Expected triangle count after `subdivision_count` rounds.
pub fn triangle_count(subdivision_count: u8) -> usize {
    seed::BASE_TRIANGLE_COUNT * 4usize.pow(subdivision_count as u32)
}

/// Expected vertex list length after `subdivision_count` rounds.
pub fn vertex_count(subdivision_count: u8) -> usize {
    seed::BASE_VERTEX_COUNT
        + (0..subdivision_count)
            .map(|round| triangle_count(round) * 3)
            .sum::<usize>()
}

/// Builds the spherical and flattened layouts of a geodesic icosahedron.
///
/// Both layouts are seeded with the same face wiring and subdivided in
/// lockstep, so triangle `k` and vertex `i` mean the same thing in each.
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    subdivision_count: u8,
    net_offset: Vec3,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self {
            subdivision_count: 0,
            net_offset: Vec3::new(-2.5, 0.1, 1.0),
        }
    }
}

impl MeshBuilder {
    pub fn new(subdivision_count: u8) -> Self {
        Self {
            subdivision_count,
            ..Default::default()
        }
    }

    /// Translation applied to the whole flattened net.
    pub fn with_net_offset(mut self, net_offset: Vec3) -> Self {
        self.net_offset = net_offset;
        self
    }

    pub fn build(&self) -> Result<GeodesicMeshes, GeodesicError> {
        if self.subdivision_count > MAX_SUBDIVISIONS {
            return Err(GeodesicError::TooManySubdivisions {
                requested: self.subdivision_count,
                max: MAX_SUBDIVISIONS,
            });
        }

        let build_span = info_span!("build_geodesic_meshes");
        let _build_guard = build_span.enter();
        let start = Instant::now();

        let mut spherical = MeshVariant::new(seed::spherical_vertices());
        let mut flattened = MeshVariant::new(seed::flattened_vertices(self.net_offset));

        let degenerate = spherical
            .triangles
            .iter()
            .chain(&flattened.triangles)
            .filter(|triangle| triangle.is_degenerate())
            .count();
        if degenerate > 0 {
            warn!("{} degenerate base triangles", degenerate);
        }

        for _ in 0..self.subdivision_count {
            spherical.subdivide(true);
            flattened.subdivide(false);
        }

        let meshes = GeodesicMeshes::new(spherical, flattened)?;

        info!(
            "Built geodesic meshes with {} subdivisions: {} vertices, {} triangles in {:?}",
            self.subdivision_count,
            meshes.vertex_count(),
            meshes.triangle_count(),
            start.elapsed()
        );

        Ok(meshes)
    }
}

/// The two index-aligned layouts produced by [`MeshBuilder`].
#[derive(Debug, Clone)]
pub struct GeodesicMeshes {
    spherical: MeshVariant,
    flattened: MeshVariant,
}

impl GeodesicMeshes {
    /// Pairs two layouts, checking that they stay index for index parallel.
    pub fn new(spherical: MeshVariant, flattened: MeshVariant) -> Result<Self, GeodesicError> {
        if spherical.vertices.len() != flattened.vertices.len() {
            return Err(GeodesicError::VariantMismatch {
                spherical: spherical.vertices.len(),
                flattened: flattened.vertices.len(),
            });
        }
        if spherical.triangles.len() != flattened.triangles.len() {
            return Err(GeodesicError::TriangleCountMismatch {
                spherical: spherical.triangles.len(),
                flattened: flattened.triangles.len(),
            });
        }
        Ok(Self {
            spherical,
            flattened,
        })
    }

    pub fn spherical(&self) -> &MeshVariant {
        &self.spherical
    }

    pub fn flattened(&self) -> &MeshVariant {
        &self.flattened
    }

    pub fn vertex_count(&self) -> usize {
        self.spherical.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.spherical.triangles.len()
    }
}
