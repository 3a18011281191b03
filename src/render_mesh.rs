//! Flat vertex and index buffers ready to hand to a renderer.

use bevy_asset::RenderAssetUsages;
use bevy_math::Vec3;
use bevy_mesh::{Indices, Mesh, MeshVertexAttribute, PrimitiveTopology, VertexAttributeValues};

use crate::{
    builder::MeshVariant,
    common::{triangle::Triangle, VertexIndex},
    error::GeodesicError,
};

/// Positions, stride-3 triangle indices, and per-vertex normals.
///
/// The index list is fixed once built. Only positions (and the normals derived
/// from them) change while morphing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub normals: Vec<Vec3>,
}

impl RenderMesh {
    /// Resolves every triangle corner of `variant` to the first vertex with an
    /// identical position, then computes normals.
    pub fn from_variant(variant: &MeshVariant) -> Result<Self, GeodesicError> {
        let lookup = VertexIndex::new(&variant.vertices);

        let mut indices = Vec::with_capacity(variant.triangles.len() * 3);
        for (i, triangle) in variant.triangles.iter().enumerate() {
            indices.extend(lookup.resolve(i, triangle)?.map(|index| index as u32));
        }

        let mut mesh = Self {
            positions: variant.vertices.clone(),
            indices,
            normals: Vec::new(),
        };
        mesh.compute_normals();
        Ok(mesh)
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(|corners| {
            Triangle::new([
                self.positions[corners[0] as usize],
                self.positions[corners[1] as usize],
                self.positions[corners[2] as usize],
            ])
        })
    }

    /// Smooth vertex normals: the area-weighted sum of the face normals around
    /// each vertex. Vertices no face uses get a zero normal.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for (corners, triangle) in self.indices.chunks_exact(3).zip(self.triangles()) {
            let face = triangle.scaled_normal();
            for &corner in corners {
                normals[corner as usize] += face;
            }
        }
        self.normals = normals.into_iter().map(Vec3::normalize_or_zero).collect();
    }

    /// Takes the triangle list of a Bevy mesh, whichever index width it uses.
    pub fn set_indices(&mut self, indices: &Indices) {
        self.indices = match indices {
            Indices::U16(items) => items.iter().map(|&i| i as u32).collect(),
            Indices::U32(items) => items.clone(),
        };
    }

    /// 16-bit indices when every vertex is addressable with them.
    pub fn bevy_indices(&self) -> Indices {
        if self.positions.len() <= u16::MAX as usize + 1 {
            Indices::U16(self.indices.iter().map(|&i| i as u16).collect())
        } else {
            Indices::U32(self.indices.clone())
        }
    }

    pub fn to_bevy_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, to_float3(&self.positions));
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, to_float3(&self.normals));
        mesh.insert_indices(self.bevy_indices());
        mesh
    }

    /// Overwrites the positions of `mesh`, and its normals unless none were computed.
    pub fn write_into(&self, mesh: &mut Mesh) {
        write_float3(mesh, Mesh::ATTRIBUTE_POSITION, &self.positions);
        if !self.normals.is_empty() {
            write_float3(mesh, Mesh::ATTRIBUTE_NORMAL, &self.normals);
        }
    }
}

fn to_float3(values: &[Vec3]) -> Vec<[f32; 3]> {
    values.iter().map(|v| v.to_array()).collect()
}

fn write_float3(mesh: &mut Mesh, attribute: MeshVertexAttribute, values: &[Vec3]) {
    if let Some(VertexAttributeValues::Float32x3(existing)) = mesh.attribute_mut(attribute) {
        if existing.len() == values.len() {
            for (dst, src) in existing.iter_mut().zip(values) {
                *dst = src.to_array();
            }
            return;
        }
    }
    mesh.insert_attribute(attribute, to_float3(values));
}
