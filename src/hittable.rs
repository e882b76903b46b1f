//! Ray-object intersection system.
//!
//! Defines the Hittable trait for geometric primitives and HitRecord for
//! storing intersection data. A test either yields a complete record or
//! nothing at all, so a record is never observed half-filled.

use glam::Vec3A;

use crate::error::Degeneracy;
use crate::ray::Ray;

/// Ray-object intersection information.
///
/// Contains the distance, position and surface normal needed for shading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Distance along the ray to the intersection point.
    ///
    /// Not restricted in sign: primitives report the plane crossing even when
    /// it lies behind the ray origin.
    pub t: f32,
    /// Point where the ray intersects the object
    pub p: Vec3A,
    /// Surface normal at the intersection point (unit vector)
    pub normal: Vec3A,
    /// First barycentric coordinate, weight of the second vertex
    pub u: f32,
    /// Second barycentric coordinate, weight of the third vertex
    pub v: f32,
}

impl Default for HitRecord {
    /// The "no hit yet" record: infinitely far away.
    fn default() -> Self {
        Self {
            t: f32::INFINITY,
            p: Vec3A::ZERO,
            normal: Vec3A::ZERO,
            u: 0.0,
            v: 0.0,
        }
    }
}

impl HitRecord {
    /// True when every field is free of NaN and infinity.
    pub fn is_finite(&self) -> bool {
        self.t.is_finite()
            && self.p.is_finite()
            && self.normal.is_finite()
            && self.u.is_finite()
            && self.v.is_finite()
    }
}

/// Trait for objects that can be intersected by rays.
///
/// Must be thread-safe (Sync + Send) for parallel rendering.
pub trait Hittable: Sync + Send {
    /// Test for ray intersection.
    ///
    /// Returns `Some(record)` on a hit and `None` on a miss. Degenerate
    /// arithmetic is not detected: NaN and infinity flow into the record.
    fn hit(&self, r: &Ray) -> Option<HitRecord>;

    /// Like [`Hittable::hit`], but reports numerical degeneracies instead of
    /// letting them propagate.
    fn hit_strict(&self, r: &Ray) -> Result<Option<HitRecord>, Degeneracy> {
        match self.hit(r) {
            Some(rec) if !rec.is_finite() => Err(Degeneracy::NonFinite),
            other => Ok(other),
        }
    }
}
