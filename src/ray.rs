//! Ray representation for primary-ray casting.
//!
//! A ray is the half-line r(t) = origin + t * direction. Primary rays are
//! built once per pixel by the camera and discarded after the pixel is shaded.

use glam::Vec3A;

/// Ray in 3D space defined by origin and unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    ///
    /// For primary rays this is the optical center of the pinhole camera.
    pub origin: Vec3A,

    /// Unit-length direction of the ray.
    ///
    /// Distances reported by intersection tests are measured in units of
    /// this vector, so it is normalized on construction.
    pub direction: Vec3A,
}

impl Ray {
    /// Create a new ray, normalizing `direction`.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }
}
