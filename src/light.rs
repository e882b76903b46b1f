//! Point light source.

use glam::Vec3A;
use serde::{Deserialize, Serialize};

use crate::material::Color;

/// Light emitted from a single point, with no falloff.
///
/// Color channels are nominally in [0, 1] but are not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    /// Position of the light in world coordinates
    pub position: Vec3A,
    /// Emitted RGB intensity
    pub color: Color,
}

impl PointLight {
    /// Create a new point light.
    pub fn new(position: Vec3A, color: Color) -> Self {
        Self { position, color }
    }
}

impl Default for PointLight {
    /// Light of the reference scene: up, left and behind the camera.
    fn default() -> Self {
        Self::new(Vec3A::new(-10.0, 10.0, 4.0), Color::splat(0.8))
    }
}
