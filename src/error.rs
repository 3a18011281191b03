use bevy_math::Vec3;
use thiserror::Error;

/// Failures raised while generating or animating a geodesic mesh.
///
/// Generation is deterministic, so every variant points at a broken invariant
/// or a bad configuration rather than a transient fault.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeodesicError {
    #[error("corner {corner} of triangle {triangle} at {position} has no exact vertex match")]
    IndexResolution {
        triangle: usize,
        corner: usize,
        position: Vec3,
    },
    #[error("spherical variant has {spherical} vertices but flattened variant has {flattened}")]
    VariantMismatch { spherical: usize, flattened: usize },
    #[error("spherical variant has {spherical} triangles but flattened variant has {flattened}")]
    TriangleCountMismatch { spherical: usize, flattened: usize },
    #[error("{requested} subdivisions requested, at most {max} fit in a single mesh")]
    TooManySubdivisions { requested: u8, max: u8 },
    #[error("render buffer has {buffer} vertices, morph targets have {spherical} and {flattened}")]
    TargetLengthMismatch {
        buffer: usize,
        spherical: usize,
        flattened: usize,
    },
}
