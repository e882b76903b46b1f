//! Triangle primitive.
//!
//! Ray-triangle intersection in the Möller-Trumbore formulation. The test has
//! no `t` range: a plane crossing behind the ray origin is still reported, and
//! callers that need a visible-only hit cull on `t` themselves.

use glam::Vec3A;
use serde::{Deserialize, Serialize};

use crate::error::Degeneracy;
use crate::hittable::{HitRecord, Hittable};
use crate::interval::Interval;
use crate::ray::Ray;

/// Triangle defined by three ordered vertices.
///
/// Winding order decides which side the shading normal faces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    /// First vertex (barycentric weight `1 - u - v`)
    pub v1: Vec3A,
    /// Second vertex (barycentric weight `u`)
    pub v2: Vec3A,
    /// Third vertex (barycentric weight `v`)
    pub v3: Vec3A,
}

/// Intermediate values of one intersection test.
struct Solve {
    inv_det: f32,
    t: f32,
    u: f32,
    v: f32,
}

impl Triangle {
    /// Create a new triangle.
    pub fn new(v1: Vec3A, v2: Vec3A, v3: Vec3A) -> Self {
        Self { v1, v2, v3 }
    }

    /// Arithmetic mean of the three vertices.
    pub fn centroid(&self) -> Vec3A {
        (self.v1 + self.v2 + self.v3) / 3.0
    }

    /// Unit normal of the triangle's plane, with the same orientation as
    /// the shading normal reported by [`Triangle::hit`].
    pub fn face_normal(&self) -> Vec3A {
        (self.v3 - self.v1).cross(self.v2 - self.v1).normalize()
    }

    /// Point with barycentric coordinates (u, v).
    pub fn interpolate(&self, u: f32, v: f32) -> Vec3A {
        self.v1 * (1.0 - u - v) + self.v2 * u + self.v3 * v
    }

    /// Barycentric solve shared by the permissive and strict tests.
    fn solve(&self, r: &Ray) -> Solve {
        let e1 = self.v2 - self.v1;
        let e2 = self.v3 - self.v1;

        let pvec = r.direction.cross(e2);
        let inv_det = 1.0 / e1.dot(pvec);

        let tvec = r.origin - self.v1;
        let qvec = tvec.cross(e1);

        let u = tvec.dot(pvec) * inv_det;
        let v = r.direction.dot(qvec) * inv_det;
        let t = e2.dot(qvec) * inv_det;

        Solve { inv_det, t, u, v }
    }

    /// Rejection rules, `u` first, then `v` and `u + v`. Both ends of each
    /// range are accepted.
    fn accepts(s: &Solve) -> bool {
        !(Interval::UNIT.excludes(s.u)
            || Interval::NON_NEGATIVE.excludes(s.v)
            || Interval::AT_MOST_ONE.excludes(s.u + s.v))
    }

    /// Normal at `p`, recomputed from the hit point rather than the edges.
    fn normal_at(&self, p: Vec3A) -> Vec3A {
        (self.v3 - p).cross(self.v2 - p).normalize()
    }

    fn record(&self, s: &Solve) -> HitRecord {
        let p = self.interpolate(s.u, s.v);
        HitRecord {
            t: s.t,
            p,
            normal: self.normal_at(p),
            u: s.u,
            v: s.v,
        }
    }
}

impl Hittable for Triangle {
    fn hit(&self, r: &Ray) -> Option<HitRecord> {
        let s = self.solve(r);
        Self::accepts(&s).then(|| self.record(&s))
    }

    fn hit_strict(&self, r: &Ray) -> Result<Option<HitRecord>, Degeneracy> {
        let s = self.solve(r);
        if !s.inv_det.is_finite() {
            return Err(Degeneracy::ParallelRay);
        }
        if !Self::accepts(&s) {
            return Ok(None);
        }

        let rec = self.record(&s);
        if !rec.normal.is_finite() {
            return Err(Degeneracy::ZeroAreaNormal);
        }
        if !rec.is_finite() {
            return Err(Degeneracy::NonFinite);
        }
        Ok(Some(rec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Right triangle in the z = -1 plane whose barycentrics equal (x, y).
    fn unit_triangle() -> Triangle {
        Triangle::new(
            Vec3A::new(0.0, 0.0, -1.0),
            Vec3A::new(1.0, 0.0, -1.0),
            Vec3A::new(0.0, 1.0, -1.0),
        )
    }

    fn ray_towards(target: Vec3A) -> Ray {
        Ray::new(Vec3A::ZERO, target)
    }

    #[test]
    fn centroid_hit_along_negated_normal() {
        let tri = Triangle::new(
            Vec3A::new(-1.0, -1.0, -3.5),
            Vec3A::new(1.0, 1.0, -3.0),
            Vec3A::new(0.75, -1.0, -2.5),
        );
        let n = tri.face_normal();
        let origin = tri.centroid() + 2.0 * n;
        let rec = tri.hit(&Ray::new(origin, -n)).expect("centroid must be hit");

        assert!(rec.u >= 0.0 && rec.v >= 0.0);
        let w = 1.0 - rec.u - rec.v;
        assert!((w + rec.u + rec.v - 1.0).abs() < 1e-6);
        assert!((rec.u - 1.0 / 3.0).abs() < 1e-4);
        assert!((rec.v - 1.0 / 3.0).abs() < 1e-4);
        assert!((rec.t - 2.0).abs() < 1e-4);
        assert!(rec.p.abs_diff_eq(tri.centroid(), 1e-4));
        assert!(rec.normal.abs_diff_eq(n, 1e-4));
    }

    #[test]
    fn barycentrics_match_plane_coordinates() {
        let rec = unit_triangle()
            .hit(&ray_towards(Vec3A::new(0.25, 0.5, -1.0)))
            .unwrap();
        assert!((rec.u - 0.25).abs() < 1e-6);
        assert!((rec.v - 0.5).abs() < 1e-6);
        assert!(rec.p.abs_diff_eq(Vec3A::new(0.25, 0.5, -1.0), 1e-6));
    }

    #[test]
    fn edges_are_inclusive() {
        let tri = unit_triangle();
        let on_v_zero = tri.hit(&ray_towards(Vec3A::new(0.5, 0.0, -1.0))).unwrap();
        assert_eq!(on_v_zero.v, 0.0);

        let on_u_zero = tri.hit(&ray_towards(Vec3A::new(0.0, 0.5, -1.0))).unwrap();
        assert_eq!(on_u_zero.u, 0.0);
    }

    #[test]
    fn rejects_outside_barycentric_range() {
        let tri = unit_triangle();
        assert!(tri.hit(&ray_towards(Vec3A::new(1.0001, 0.0, -1.0))).is_none());
        assert!(tri.hit(&ray_towards(Vec3A::new(-0.0001, 0.5, -1.0))).is_none());
        assert!(tri.hit(&ray_towards(Vec3A::new(0.5, -0.0001, -1.0))).is_none());
        assert!(tri.hit(&ray_towards(Vec3A::new(0.6, 0.5, -1.0))).is_none());
    }

    #[test]
    fn hypotenuse_and_vertices_are_hits_with_undefined_normal() {
        let tri = unit_triangle();
        let r = Ray::new(Vec3A::new(0.5, 0.5, 0.0), Vec3A::NEG_Z);
        let rec = tri.hit(&r).expect("u + v = 1 is inside");
        assert_eq!((rec.u, rec.v, rec.t), (0.5, 0.5, 1.0));
        // p lies on the v2-v3 edge, so both recomputed edges are collinear.
        assert!(rec.normal.is_nan());
        assert_eq!(tri.hit_strict(&r), Err(Degeneracy::ZeroAreaNormal));

        let at_v2 = tri.hit(&Ray::new(Vec3A::new(1.0, 0.0, 0.0), Vec3A::NEG_Z)).unwrap();
        assert_eq!((at_v2.u, at_v2.v), (1.0, 0.0));
        assert!(at_v2.normal.is_nan());
    }

    #[test]
    fn normal_follows_winding() {
        let tri = unit_triangle();
        let rec = tri.hit(&ray_towards(Vec3A::new(0.2, 0.2, -1.0))).unwrap();
        assert!(rec.normal.abs_diff_eq(Vec3A::NEG_Z, 1e-6));

        let flipped = Triangle::new(tri.v1, tri.v3, tri.v2);
        let rec = flipped.hit(&ray_towards(Vec3A::new(0.2, 0.2, -1.0))).unwrap();
        assert!(rec.normal.abs_diff_eq(Vec3A::Z, 1e-6));
    }

    #[test]
    fn reports_hits_behind_the_origin() {
        let r = Ray::new(Vec3A::new(0.2, 0.2, 0.0), Vec3A::Z);
        let rec = unit_triangle().hit(&r).expect("plane crossing behind origin");
        assert!((rec.t + 1.0).abs() < 1e-6);
    }

    #[test]
    fn parallel_ray_misses_in_permissive_mode() {
        let r = Ray::new(Vec3A::ZERO, Vec3A::X);
        assert!(unit_triangle().hit(&r).is_none());
    }

    #[test]
    fn in_plane_ray_leaks_nan_but_strict_mode_reports_it() {
        let tri = unit_triangle();
        let r = Ray::new(Vec3A::new(0.2, 0.2, -1.0), Vec3A::X);

        let rec = tri.hit(&r).expect("NaN barycentrics pass the rejection tests");
        assert!(rec.t.is_nan());

        assert_eq!(tri.hit_strict(&r), Err(Degeneracy::ParallelRay));
    }

    #[test]
    fn strict_mode_agrees_on_regular_rays() {
        let tri = unit_triangle();
        let hit = ray_towards(Vec3A::new(0.1, 0.3, -1.0));
        let miss = ray_towards(Vec3A::new(0.9, 0.9, -1.0));
        assert_eq!(tri.hit_strict(&hit), Ok(tri.hit(&hit)));
        assert_eq!(tri.hit_strict(&miss), Ok(None));
    }

    #[test]
    fn collapsed_triangle_is_degenerate() {
        let p = Vec3A::new(0.0, 0.0, -1.0);
        let tri = Triangle::new(p, p, p);
        assert!(tri.hit_strict(&ray_towards(p)).is_err());
    }
}
