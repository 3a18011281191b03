use bevy_math::prelude::*;

use crate::error::GeodesicError;

/// A triangle owning its three corner positions.
///
/// Corners are stored by value, not as indices into a shared vertex list, so a
/// triangle stays valid while the list it came from keeps growing. Winding is
/// counter-clockwise around the outward normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub positions: [Vec3; 3],
}

impl Triangle {
    pub fn new(positions: [Vec3; 3]) -> Self {
        Self { positions }
    }

    /// Edge midpoints, ordered `[mid(v0, v1), mid(v0, v2), mid(v1, v2)]`.
    ///
    /// With `normalize` every midpoint is pushed out onto the unit sphere.
    pub fn midpoints(&self, normalize: bool) -> [Vec3; 3] {
        let [v0, v1, v2] = self.positions;
        let midpoints = [(v0 + v1) / 2.0, (v0 + v2) / 2.0, (v1 + v2) / 2.0];

        if normalize {
            midpoints.map(|m| m / m.length())
        } else {
            midpoints
        }
    }

    /// Splits the triangle into three corner triangles and a center one.
    ///
    /// ```text
    ///             v0
    ///             /\
    ///           /   \
    ///      m0 /______\ m1
    ///       / \      /\
    ///     /    \   /   \
    ///   /_______\/______\
    ///  v1       m2       v2
    /// ```
    pub fn subdivide(&self, normalize: bool) -> [Triangle; 4] {
        let [v0, v1, v2] = self.positions;
        let [m0, m1, m2] = self.midpoints(normalize);

        [
            Triangle::new([v0, m0, m1]),
            Triangle::new([v1, m2, m0]),
            Triangle::new([v2, m1, m2]),
            Triangle::new([m0, m2, m1]),
        ]
    }

    /// Finds the first exact match of each corner in `vertices`.
    ///
    /// This is a linear scan per corner; whole meshes go through
    /// [`VertexIndex`](crate::common::VertexIndex) instead.
    pub fn resolve_indices(
        &self,
        triangle_index: usize,
        vertices: &[Vec3],
    ) -> Result<[usize; 3], GeodesicError> {
        let mut indices = [0; 3];
        for (corner, position) in self.positions.iter().enumerate() {
            indices[corner] = vertices
                .iter()
                .position(|vertex| vertex == position)
                .ok_or(GeodesicError::IndexResolution {
                    triangle: triangle_index,
                    corner,
                    position: *position,
                })?;
        }
        Ok(indices)
    }

    /// Unnormalized face normal, `(v1 - v0) x (v2 - v0)`. Its length is twice the area.
    pub fn scaled_normal(&self) -> Vec3 {
        let [v0, v1, v2] = self.positions;
        (v1 - v0).cross(v2 - v0)
    }

    pub fn normal(&self) -> Vec3 {
        self.scaled_normal().normalize_or_zero()
    }

    pub fn centroid(&self) -> Vec3 {
        let [v0, v1, v2] = self.positions;
        (v0 + v1 + v2) / 3.0
    }

    /// True when the corners collapse onto a line or a point.
    pub fn is_degenerate(&self) -> bool {
        self.scaled_normal().length_squared() <= f32::EPSILON * f32::EPSILON
    }
}
