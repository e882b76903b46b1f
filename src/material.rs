//! Phong material and local illumination.
//!
//! Shading is ambient + diffuse + specular from a single point light. There is
//! no shadowing and no recursion; the result is left unclamped for the output
//! sink to deal with.

use glam::Vec3A;
use serde::{Deserialize, Serialize};

use crate::hittable::HitRecord;
use crate::light::PointLight;

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// Phong reflectance coefficients of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Ambient reflectance
    pub ka: Color,
    /// Diffuse reflectance
    pub kd: Color,
    /// Specular reflectance
    pub ks: Color,
    /// Specular exponent
    pub shininess: f32,
}

impl Default for Material {
    /// Red plastic with a white highlight.
    fn default() -> Self {
        Self {
            ka: Color::new(1.0, 0.0, 0.0),
            kd: Color::new(1.0, 0.0, 0.0),
            ks: Color::ONE,
            shininess: 32.0,
        }
    }
}

/// The three terms of the local illumination model, kept apart for
/// inspection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shading {
    /// `ambient ⊙ ka`
    pub ambient: Color,
    /// `light ⊙ kd * max(0, N·L)`
    pub diffuse: Color,
    /// `light ⊙ ks * max(0, R·V)^shininess`
    pub specular: Color,
}

impl Shading {
    /// Sum of the three terms.
    pub fn total(&self) -> Color {
        self.diffuse + self.ambient + self.specular
    }
}

impl Material {
    /// Evaluate the Phong model at a hit point.
    ///
    /// The view vector is the normalized hit position, which points along the
    /// primary ray only because the camera sits at the world origin. `R` is
    /// `L` reflected about the normal; together with that choice of `V` the
    /// two sign flips cancel and the highlight lands where Phong puts it.
    pub fn shade_terms(&self, rec: &HitRecord, ambient: Color, light: &PointLight) -> Shading {
        let n = rec.normal;
        let l = (light.position - rec.p).normalize();
        let r = reflect(l, n);
        let v = rec.p.normalize();

        let diffuse = (light.color * self.kd) * non_negative(n.dot(l));
        let specular = (light.color * self.ks) * non_negative(r.dot(v)).powf(self.shininess);

        Shading {
            ambient: ambient * self.ka,
            diffuse,
            specular,
        }
    }

    /// Color observed at a hit point, unclamped.
    pub fn shade(&self, rec: &HitRecord, ambient: Color, light: &PointLight) -> Color {
        self.shade_terms(rec, ambient, light).total()
    }
}

/// `max(0, x)` that keeps NaN, unlike `f32::max`.
fn non_negative(x: f32) -> f32 {
    if x < 0.0 {
        0.0
    } else {
        x
    }
}

/// Reflect a vector about a normal: `v - 2 (v·n) n`.
pub fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}
