//! trishade ray caster
//!
//! Casts one primary ray per pixel from a pinhole camera, intersects it with a
//! triangle and shades the hit with a Phong model under a single point light.
//! Outputs 8-bit PNG or linear HDR EXR.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod camera;
pub mod error;
pub mod hittable;
pub mod interval;
pub mod light;
pub mod material;
pub mod output;
pub mod ray;
pub mod render;
pub mod scene;
pub mod triangle;

pub use camera::{Camera, CameraSettings, PixelSampling};
pub use error::{Degeneracy, RenderError};
pub use hittable::{HitRecord, Hittable};
pub use light::PointLight;
pub use material::{Color, Material, Shading};
pub use output::{Canvas, Footprint, PixelSink};
pub use ray::Ray;
pub use render::{flush, Framebuffer, Renderer};
pub use scene::{OutputSettings, RenderSettings, Scene};
pub use triangle::Triangle;
