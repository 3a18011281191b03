use bevy_math::Vec3;
use bevy_utils::HashMap;
use triangle::Triangle;

use crate::error::GeodesicError;

pub mod triangle;

/// Hashable bit pattern of a position, with `-0.0` folded into `0.0` so that
/// two positions share a key exactly when they compare equal with `==`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionKey([u32; 3]);

impl From<Vec3> for PositionKey {
    fn from(position: Vec3) -> Self {
        // adding +0.0 turns -0.0 into +0.0 and leaves every other value untouched
        let canonical = position + Vec3::ZERO;
        Self(canonical.to_array().map(f32::to_bits))
    }
}

/// Maps each distinct position of a vertex list to the index where it first appears.
///
/// Lookups give the same answer as a first-match linear scan, in constant time.
#[derive(Debug, Default, Clone)]
pub struct VertexIndex {
    first_seen: HashMap<PositionKey, usize>,
}

impl VertexIndex {
    pub fn new(vertices: &[Vec3]) -> Self {
        let mut first_seen = HashMap::default();
        for (i, vertex) in vertices.iter().enumerate() {
            first_seen.entry(PositionKey::from(*vertex)).or_insert(i);
        }
        Self { first_seen }
    }

    pub fn get(&self, position: Vec3) -> Option<usize> {
        self.first_seen.get(&PositionKey::from(position)).copied()
    }

    pub fn resolve(
        &self,
        triangle_index: usize,
        triangle: &Triangle,
    ) -> Result<[usize; 3], GeodesicError> {
        let mut indices = [0; 3];
        for (corner, position) in triangle.positions.iter().enumerate() {
            indices[corner] = self
                .get(*position)
                .ok_or(GeodesicError::IndexResolution {
                    triangle: triangle_index,
                    corner,
                    position: *position,
                })?;
        }
        Ok(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_zero_shares_a_key() {
        assert_eq!(
            PositionKey::from(Vec3::new(-0.0, 1.0, 0.0)),
            PositionKey::from(Vec3::new(0.0, 1.0, -0.0))
        );
        assert_ne!(
            PositionKey::from(Vec3::new(1.0, 1.0, 0.0)),
            PositionKey::from(Vec3::new(1.0, 1.0, f32::EPSILON))
        );
    }

    #[test]
    fn vertex_index_agrees_with_linear_scan() {
        let vertices = vec![Vec3::X, Vec3::Y, Vec3::X, Vec3::Z, Vec3::Y];
        let index = VertexIndex::new(&vertices);
        assert_eq!(index.get(Vec3::X), Some(0));
        assert_eq!(index.get(Vec3::Y), Some(1));

        let triangle = Triangle::new([Vec3::Z, Vec3::Y, Vec3::X]);
        assert_eq!(
            index.resolve(0, &triangle),
            triangle.resolve_indices(0, &vertices)
        );
        assert_eq!(index.resolve(0, &triangle), Ok([3, 1, 0]));
    }

    #[test]
    fn unknown_position_is_missing() {
        let index = VertexIndex::new(&[Vec3::X, Vec3::X, Vec3::NEG_Y]);
        assert_eq!(index.get(Vec3::NEG_Y), Some(2));
        assert_eq!(index.get(Vec3::Z), None);
    }
}
