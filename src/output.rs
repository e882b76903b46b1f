//! # Output Module
//!
//! Pixel sinks and image files.
//!
//! - [`PixelSink`] is the raster surface the render loop writes finished
//!   pixels to, one `(x, y, color)` at a time.
//! - [`Canvas`] is an 8-bit sink backed by an `image::RgbImage`. It converts
//!   each channel with `clamp(round(c * 255), 0, 255)`, with no gamma curve,
//!   and can be saved as PNG.
//! - [`save_exr`] writes the unclamped HDR framebuffer as linear OpenEXR.

use std::path::Path;

use exr::prelude::write_rgb_file;
use image::{Rgb, RgbImage};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::interval::Interval;
use crate::material::Color;
use crate::render::Framebuffer;

/// A 2D raster surface accepting `(x, y, color)` writes.
///
/// Colors arrive unclamped; mapping them to the surface's range is the
/// sink's job.
pub trait PixelSink {
    /// Write one pixel.
    fn put_pixel(&mut self, x: u32, y: u32, color: Color);
}

/// Pixel area covered by one sink write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Footprint {
    /// A 1x2 block at (x, y) and (x, y + 1), clipped at the bottom edge.
    ///
    /// Under a row-major flush each row is overwritten by its own pixels
    /// afterwards, so the final image equals a single-pixel write.
    #[default]
    DoubleHeight,
    /// Exactly the pixel at (x, y).
    Single,
}

impl Footprint {
    fn rows(self) -> u32 {
        match self {
            Footprint::DoubleHeight => 2,
            Footprint::Single => 1,
        }
    }
}

/// Convert one unclamped linear channel to 8 bits.
///
/// NaN maps to 0.
pub fn channel_to_u8(c: f32) -> u8 {
    Interval::BYTE.clamp((c * 255.0).round()) as u8
}

/// Convert an unclamped linear color to 8-bit RGB.
pub fn to_rgb8(color: Color) -> Rgb<u8> {
    Rgb([
        channel_to_u8(color.x),
        channel_to_u8(color.y),
        channel_to_u8(color.z),
    ])
}

/// 8-bit RGB canvas.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbImage,
    footprint: Footprint,
}

impl Canvas {
    /// Create a black canvas.
    pub fn new(width: u32, height: u32, footprint: Footprint) -> Self {
        Self {
            image: RgbImage::new(width, height),
            footprint,
        }
    }

    /// The pixels written so far.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Consume the canvas, returning its pixels.
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Save the canvas as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        self.image.save(path)?;
        info!("Image saved as {}", path.display());
        Ok(())
    }
}

impl PixelSink for Canvas {
    fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        let rgb = to_rgb8(color);
        let (width, height) = self.image.dimensions();
        if x >= width {
            return;
        }
        for row in y..y.saturating_add(self.footprint.rows()).min(height) {
            self.image.put_pixel(x, row, rgb);
        }
    }
}

/// Save the HDR framebuffer as a linear OpenEXR file, no clamping.
pub fn save_exr(image: &Framebuffer, path: impl AsRef<Path>) -> Result<(), RenderError> {
    let path = path.as_ref();
    let (width, height) = image.dimensions();
    write_rgb_file(path, width as usize, height as usize, |x, y| {
        let p = image.get_pixel(x as u32, y as u32);
        (p[0], p[1], p[2])
    })?;
    info!("HDR image saved as EXR: {}", path.display());
    Ok(())
}
