//! Base icosahedron, as a sphere and as an unfolded net.
//!
//! Both layouts use the same 22 vertex slots. The sphere only has 12 distinct
//! corners: the top pole fills slots 0..5, the bottom pole slots 17..22, and
//! two ring corners appear twice (slots 5 and 10, slots 11 and 16). On the net
//! every slot is a distinct point.

use bevy_math::Vec3;

use crate::common::triangle::Triangle;

pub const BASE_VERTEX_COUNT: usize = 22;
pub const BASE_TRIANGLE_COUNT: usize = 20;

/// Slot triples of the 20 faces, shared by both layouts.
///
/// ```text
///    0     1     2     3     4
///   / \   / \   / \   / \   / \
///  5---6---7---8---9---10
///   \ / \ / \ / \ / \ / \
///    11--12--13--14--15--16
///     \ / \ / \ / \ / \ /
///      17  18  19  20  21
/// ```
#[rustfmt::skip]
pub const BASE_TRIANGLES: [[usize; 3]; BASE_TRIANGLE_COUNT] = [
    [5, 0, 6], [6, 1, 7], [7, 2, 8], [8, 3, 9], [9, 4, 10],
    [5, 6, 11], [6, 7, 12], [7, 8, 13], [8, 9, 14], [9, 10, 15],
    [11, 6, 12], [12, 7, 13], [13, 8, 14], [14, 9, 15], [15, 10, 16],
    [11, 12, 17], [12, 13, 18], [13, 14, 19], [14, 15, 20], [15, 16, 21],
];

/// The golden ratio.
pub fn golden_ratio() -> f32 {
    (1.0 + 5.0_f32.sqrt()) / 2.0
}

/// Icosahedron corners on the unit sphere, laid out in the shared 22 slots.
pub fn spherical_vertices() -> Vec<Vec3> {
    let t = golden_ratio();
    let top = Vec3::new(-1.0, t, 0.0).normalize();
    let bottom = Vec3::new(1.0, -t, 0.0).normalize();
    let upper_seam = Vec3::new(1.0, t, 0.0).normalize();
    let lower_seam = Vec3::new(t, 0.0, 1.0).normalize();

    let mut vertices = Vec::with_capacity(BASE_VERTEX_COUNT);
    vertices.extend([top; 5]);
    vertices.extend([
        upper_seam,
        Vec3::new(0.0, 1.0, t).normalize(),
        Vec3::new(-t, 0.0, 1.0).normalize(),
        Vec3::new(-t, 0.0, -1.0).normalize(),
        Vec3::new(0.0, 1.0, -t).normalize(),
        upper_seam,
    ]);
    vertices.extend([
        lower_seam,
        Vec3::new(0.0, -1.0, t).normalize(),
        Vec3::new(-1.0, -t, 0.0).normalize(),
        Vec3::new(0.0, -1.0, -t).normalize(),
        Vec3::new(t, 0.0, -1.0).normalize(),
        lower_seam,
    ]);
    vertices.extend([bottom; 5]);
    vertices
}

/// Length of every icosahedron edge on the unit sphere.
pub fn edge_length() -> f32 {
    let t = golden_ratio();
    Vec3::new(-1.0, t, 0.0)
        .normalize()
        .distance(Vec3::new(1.0, t, 0.0).normalize())
}

/// The 22 slots unfolded into a net of four staggered rows, translated by `offset`.
pub fn flattened_vertices(offset: Vec3) -> Vec<Vec3> {
    let d = edge_length();
    let h = d * 3.0_f32.sqrt() / 2.0;

    // (first x in units of d, slot count, y) per row, top to bottom
    let rows = [(0.5, 5, h), (0.0, 6, 0.0), (0.5, 6, -h), (1.0, 5, -2.0 * h)];

    rows.into_iter()
        .flat_map(|(start, count, y)| {
            (0..count).map(move |i| Vec3::new(d * (start + i as f32), y, 0.0))
        })
        .map(|vertex| vertex + offset)
        .collect()
}

/// Wires the base faces over `vertices`, which must hold the 22 base slots.
pub fn base_triangles(vertices: &[Vec3]) -> Vec<Triangle> {
    BASE_TRIANGLES
        .iter()
        .map(|&[a, b, c]| Triangle::new([vertices[a], vertices[b], vertices[c]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spherical_seed_is_on_unit_sphere() {
        let vertices = spherical_vertices();
        assert_eq!(vertices.len(), BASE_VERTEX_COUNT);
        for vertex in &vertices {
            assert!((vertex.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn spherical_seed_has_twelve_corners() {
        let vertices = spherical_vertices();
        let mut distinct: Vec<Vec3> = Vec::new();
        for vertex in vertices {
            if !distinct.contains(&vertex) {
                distinct.push(vertex);
            }
        }
        assert_eq!(distinct.len(), 12);
    }

    #[test]
    fn seam_slots_are_duplicated() {
        let v = spherical_vertices();
        assert!(v[0..5].iter().all(|x| *x == v[0]));
        assert!(v[17..22].iter().all(|x| *x == v[17]));
        assert_eq!(v[5], v[10]);
        assert_eq!(v[11], v[16]);
    }

    #[test]
    fn first_spherical_face() {
        let t = golden_ratio();
        let triangles = base_triangles(&spherical_vertices());
        assert_eq!(
            triangles[0].positions,
            [
                Vec3::new(1.0, t, 0.0).normalize(),
                Vec3::new(-1.0, t, 0.0).normalize(),
                Vec3::new(0.0, 1.0, t).normalize(),
            ]
        );
    }

    #[test]
    fn every_face_is_equilateral_in_both_layouts() {
        let d = edge_length();
        for vertices in [spherical_vertices(), flattened_vertices(Vec3::ZERO)] {
            for triangle in base_triangles(&vertices) {
                let [a, b, c] = triangle.positions;
                for edge in [a.distance(b), b.distance(c), c.distance(a)] {
                    assert!((edge - d).abs() < 1e-5, "edge {edge} != {d}");
                }
            }
        }
    }

    #[test]
    fn net_rows_and_offset() {
        let d = edge_length();
        let h = d * 3.0_f32.sqrt() / 2.0;
        let offset = Vec3::new(-2.5, 0.1, 1.0);
        let net = flattened_vertices(offset);

        assert_eq!(net.len(), BASE_VERTEX_COUNT);
        assert_eq!(net[0], Vec3::new(d * 0.5, h, 0.0) + offset);
        assert_eq!(net[5], offset);
        assert_eq!(net[16], Vec3::new(d * 5.5, -h, 0.0) + offset);
        assert_eq!(net[21], Vec3::new(d * 5.0, -2.0 * h, 0.0) + offset);
        assert!(net.iter().all(|v| v.z == offset.z));
    }

    #[test]
    fn windings_face_out_of_the_sphere_and_away_from_the_net() {
        for triangle in base_triangles(&spherical_vertices()) {
            assert!(triangle.scaled_normal().dot(triangle.centroid()) > 0.0);
        }
        for triangle in base_triangles(&flattened_vertices(Vec3::ZERO)) {
            assert!(triangle.scaled_normal().z < 0.0);
        }
    }
}
