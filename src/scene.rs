//! Scene description.
//!
//! Everything a render pass needs is held in one immutable [`Scene`] value.
//! `Scene::default()` is the reference scene: one red triangle straddling the
//! image center, lit by a single white-ish point light. A JSON file may
//! override any subset of it:
//!
//! ```json
//! {
//!   "camera": { "resolution": [256, 256], "sampling": "centered" },
//!   "light": { "position": [0.0, 5.0, 2.0], "color": [1.0, 1.0, 1.0] },
//!   "render": { "strict": true }
//! }
//! ```

use std::fs;
use std::path::Path;

use glam::Vec3A;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::camera::CameraSettings;
use crate::error::RenderError;
use crate::light::PointLight;
use crate::material::{Color, Material};
use crate::output::Footprint;
use crate::triangle::Triangle;

/// How the render loop treats edge cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Abort with `DegenerateGeometry` instead of writing NaN/Inf pixels.
    pub strict: bool,
    /// Treat hits with `t <= 0` (behind the camera) as misses.
    pub cull_behind_camera: bool,
}

/// Settings of the 8-bit output sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Pixel area covered by one write
    pub footprint: Footprint,
}

/// Complete, immutable description of one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Camera intrinsics
    pub camera: CameraSettings,
    /// The only primitive in the scene
    pub triangle: Triangle,
    /// The only light in the scene
    pub light: PointLight,
    /// Surface reflectance of the triangle
    pub material: Material,
    /// Ambient light intensity
    pub ambient: Color,
    /// Color written for pixels whose ray misses
    pub background: Color,
    /// Render loop policy
    pub render: RenderSettings,
    /// Output sink policy
    pub output: OutputSettings,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            triangle: Triangle::new(
                Vec3A::new(-1.0, -1.0, -3.5),
                Vec3A::new(1.0, 1.0, -3.0),
                Vec3A::new(0.75, -1.0, -2.5),
            ),
            light: PointLight::default(),
            material: Material::default(),
            ambient: Color::splat(0.2),
            background: Color::ZERO,
            render: RenderSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

impl Scene {
    /// Parse a scene from JSON, filling unspecified fields with the
    /// reference defaults.
    pub fn from_json_str(json: &str) -> Result<Self, RenderError> {
        let scene: Scene = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Load a scene from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scene = Self::from_json_str(&json)?;
        debug!("Loaded scene from {}: {:?}", path.display(), scene);
        Ok(scene)
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.camera.resolution[0]
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.camera.resolution[1]
    }

    /// Reject scenes the camera cannot produce an image for.
    pub fn validate(&self) -> Result<(), RenderError> {
        self.camera.validate()
    }
}
