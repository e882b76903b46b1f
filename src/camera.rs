//! Pinhole camera for primary ray generation.

use glam::Vec3A;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::ray::Ray;

/// Where inside a pixel the primary ray is aimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelSampling {
    /// Horizontal center at `x + 0.5`, vertical sample at `y - 0.5`.
    ///
    /// Half a pixel above the true center; reference images are rendered
    /// this way.
    #[default]
    Reference,
    /// True pixel centers at `x + 0.5`, `y + 0.5`.
    Centered,
}

impl PixelSampling {
    fn vertical_offset(self) -> f32 {
        match self {
            PixelSampling::Reference => -0.5,
            PixelSampling::Centered => 0.5,
        }
    }
}

/// Intrinsic camera parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Image size in pixels, `[width, height]`
    pub resolution: [u32; 2],
    /// Distance from the optical center to the sensor plane
    pub distance: f32,
    /// Left edge of the sensor
    pub x_min: f32,
    /// Right edge of the sensor
    pub x_max: f32,
    /// Bottom edge of the sensor
    pub y_min: f32,
    /// Top edge of the sensor
    pub y_max: f32,
    /// Sample position inside each pixel
    pub sampling: PixelSampling,
}

impl Default for CameraSettings {
    /// 512x512 sensor spanning [-1, 1]² at distance 1.
    fn default() -> Self {
        Self {
            resolution: [512, 512],
            distance: 1.0,
            x_min: -1.0,
            x_max: 1.0,
            y_min: -1.0,
            y_max: 1.0,
            sampling: PixelSampling::Reference,
        }
    }
}

impl CameraSettings {
    /// Reject settings the camera cannot produce an image for.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.resolution.contains(&0) {
            return Err(RenderError::InvalidScene(format!(
                "resolution must be non-zero, got {}x{}",
                self.resolution[0], self.resolution[1]
            )));
        }
        if !(self.distance > 0.0) {
            return Err(RenderError::InvalidScene(format!(
                "sensor distance must be positive, got {}",
                self.distance
            )));
        }
        if !(self.x_max > self.x_min) || !(self.y_max > self.y_min) {
            return Err(RenderError::InvalidScene(format!(
                "sensor bounds are empty: x [{}, {}], y [{}, {}]",
                self.x_min, self.x_max, self.y_min, self.y_max
            )));
        }
        Ok(())
    }
}

/// Pinhole camera at the world origin looking down -Z.
///
/// The sensor geometry is cached at construction and every ray query is a
/// pure function of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Rendered image width in pixel count
    pub image_width: u32,
    /// Rendered image height in pixel count
    pub image_height: u32,
    /// Sample position inside each pixel
    pub sampling: PixelSampling,

    /// Optical center (world origin)
    center: Vec3A,
    /// World position of the top-left sensor corner
    top_left: Vec3A,
    /// Vector across the sensor, left to right
    horizontal: Vec3A,
    /// Vector down the sensor, top to bottom
    vertical: Vec3A,
}

impl Camera {
    /// Build the camera and cache its sensor vectors.
    pub fn new(settings: &CameraSettings) -> Self {
        let [image_width, image_height] = settings.resolution;
        Self {
            image_width,
            image_height,
            sampling: settings.sampling,
            center: Vec3A::ZERO,
            top_left: Vec3A::new(settings.x_min, settings.y_max, -settings.distance),
            horizontal: Vec3A::new(settings.x_max - settings.x_min, 0.0, 0.0),
            vertical: Vec3A::new(0.0, settings.y_min - settings.y_max, 0.0),
        }
    }

    /// Optical center, the origin of every primary ray.
    pub fn center(&self) -> Vec3A {
        self.center
    }

    /// Point on the sensor plane sampled for pixel (x, y).
    pub fn sensor_point(&self, x: u32, y: u32) -> Vec3A {
        let u = (x as f32 + 0.5) / self.image_width as f32;
        let v = (y as f32 + self.sampling.vertical_offset()) / self.image_height as f32;
        self.top_left + self.horizontal * u + self.vertical * v
    }

    /// Primary ray through pixel (x, y).
    ///
    /// Coordinates are expected to lie inside the image; nothing is checked.
    pub fn ray(&self, x: u32, y: u32) -> Ray {
        Ray::new(self.center, self.sensor_point(x, y) - self.center)
    }
}
