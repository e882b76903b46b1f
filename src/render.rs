//! Render loop.
//!
//! Casts one primary ray per pixel, shades the nearest hit and stores the
//! unclamped result in an HDR framebuffer. Rows are traced in parallel, each
//! writing only its own slice of the buffer; the finished buffer is then
//! flushed to a [`PixelSink`] in a single row-major pass, so the output does
//! not depend on thread scheduling.

use glam::Vec3A;
use image::{ImageBuffer, Rgb};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::camera::{Camera, CameraSettings};
use crate::error::{Degeneracy, RenderError};
use crate::hittable::{HitRecord, Hittable};
use crate::light::PointLight;
use crate::material::{Color, Material};
use crate::output::PixelSink;
use crate::scene::{RenderSettings, Scene};

/// HDR image holding linear, unclamped f32 RGB values.
pub type Framebuffer = ImageBuffer<Rgb<f32>, Vec<f32>>;

/// Everything needed to trace one scene: camera, primitive, light and
/// shading parameters.
pub struct Renderer<'a> {
    sensor: CameraSettings,
    camera: Camera,
    primitive: &'a dyn Hittable,
    light: PointLight,
    material: Material,
    ambient: Color,
    background: Color,
    settings: RenderSettings,
    show_progress: bool,
}

impl<'a> Renderer<'a> {
    /// Renderer for an arbitrary primitive, shaded with the scene's light,
    /// material and camera.
    pub fn with_primitive(scene: &Scene, primitive: &'a dyn Hittable) -> Self {
        Self {
            sensor: scene.camera,
            camera: Camera::new(&scene.camera),
            primitive,
            light: scene.light,
            material: scene.material,
            ambient: scene.ambient,
            background: scene.background,
            settings: scene.render,
            show_progress: false,
        }
    }

    /// Renderer for the scene's own triangle.
    pub fn new(scene: &'a Scene) -> Self {
        Self::with_primitive(scene, &scene.triangle)
    }

    /// Draw a progress bar on stderr while rendering.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// The camera rays are cast from.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Nearest visible hit for pixel (x, y), if any.
    ///
    /// Without culling, a hit behind the camera counts as visible.
    fn intersect(&self, x: u32, y: u32) -> Result<Option<HitRecord>, RenderError> {
        let r = self.camera.ray(x, y);
        let hit = if self.settings.strict {
            self.primitive
                .hit_strict(&r)
                .map_err(|kind| RenderError::DegenerateGeometry { x, y, kind })?
        } else {
            self.primitive.hit(&r)
        };
        Ok(hit.filter(|rec| !self.settings.cull_behind_camera || rec.t > 0.0))
    }

    /// Color of pixel (x, y).
    ///
    /// Misses return the background color without shading. Only strict mode
    /// can fail; otherwise NaN and infinity end up in the returned color.
    pub fn trace(&self, x: u32, y: u32) -> Result<Color, RenderError> {
        let Some(rec) = self.intersect(x, y)? else {
            return Ok(self.background);
        };
        let color = self.material.shade(&rec, self.ambient, &self.light);
        if self.settings.strict && !color.is_finite() {
            return Err(RenderError::DegenerateGeometry {
                x,
                y,
                kind: Degeneracy::NonFinite,
            });
        }
        Ok(color)
    }

    /// Trace every pixel into a new framebuffer.
    ///
    /// Rows are split across the current rayon pool. In strict mode the
    /// first degenerate pixel aborts the render. Camera settings that
    /// [`CameraSettings::validate`] rejects fail with `InvalidScene`.
    pub fn render(&self) -> Result<Framebuffer, RenderError> {
        self.sensor.validate()?;
        let (width, height) = (self.camera.image_width, self.camera.image_height);
        let mut image = Framebuffer::new(width, height);

        info!(
            "Rendering {}x{} using {} CPU threads...",
            width,
            height,
            rayon::current_num_threads()
        );
        if self.settings.cull_behind_camera {
            debug!("Culling hits behind the camera");
        }
        let generation_start = std::time::Instant::now();
        let pb = if self.show_progress {
            let pb = ProgressBar::new(height as u64);
            if let Ok(style) = ProgressStyle::default_bar().template("{bar:40} {pos}/{len} rows ETA: {eta}") {
                pb.set_style(style);
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        let row_len = width as usize * 3;
        image
            .par_chunks_mut(row_len)
            .enumerate()
            .try_for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(3).enumerate() {
                    let c = self.trace(x as u32, y as u32)?;
                    pixel.copy_from_slice(&[c.x, c.y, c.z]);
                }
                pb.inc(1);
                Ok::<(), RenderError>(())
            })
            .inspect_err(|e| warn!("Render aborted: {}", e))?;

        pb.finish_and_clear();
        info!("Image generated in {:.2?}", generation_start.elapsed());

        Ok(image)
    }

    /// Render and flush the result to `sink`.
    pub fn render_to(&self, sink: &mut dyn PixelSink) -> Result<Framebuffer, RenderError> {
        let image = self.render()?;
        flush(&image, sink);
        Ok(image)
    }
}

/// Write every framebuffer pixel to `sink`, once each, row by row.
pub fn flush(image: &Framebuffer, sink: &mut dyn PixelSink) {
    for (x, y, p) in image.enumerate_pixels() {
        sink.put_pixel(x, y, Vec3A::new(p[0], p[1], p[2]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ray::Ray;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts how often it is asked and never hits.
    #[derive(Default)]
    struct Void {
        calls: AtomicUsize,
    }

    impl Hittable for Void {
        fn hit(&self, _r: &Ray) -> Option<HitRecord> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Plane z = -1 with a NaN normal everywhere.
    struct Poisoned;

    impl Hittable for Poisoned {
        fn hit(&self, r: &Ray) -> Option<HitRecord> {
            let t = -1.0 / r.direction.z;
            Some(HitRecord {
                t,
                p: r.origin + t * r.direction,
                normal: Vec3A::NAN,
                u: 0.0,
                v: 0.0,
            })
        }
    }

    #[derive(Default)]
    struct Recorder {
        writes: Vec<(u32, u32, Color)>,
    }

    impl PixelSink for Recorder {
        fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
            self.writes.push((x, y, color));
        }
    }

    fn small_scene() -> Scene {
        Scene {
            camera: CameraSettings {
                resolution: [16, 8],
                ..CameraSettings::default()
            },
            background: Color::new(0.0, 0.0, 0.25),
            ..Scene::default()
        }
    }

    #[test]
    fn misses_are_background_for_every_pixel() {
        let scene = small_scene();
        let void = Void::default();
        let image = Renderer::with_primitive(&scene, &void).render().unwrap();

        assert_eq!(image.dimensions(), (16, 8));
        assert_eq!(void.calls.load(Ordering::Relaxed), 16 * 8);
        assert!(image.pixels().all(|p| *p == Rgb([0.0, 0.0, 0.25])));
    }

    #[test]
    fn flush_writes_each_pixel_once_in_row_major_order() {
        let scene = small_scene();
        let void = Void::default();
        let mut sink = Recorder::default();
        Renderer::with_primitive(&scene, &void).render_to(&mut sink).unwrap();

        let expected: Vec<(u32, u32)> = (0..8).flat_map(|y| (0..16).map(move |x| (x, y))).collect();
        let written: Vec<(u32, u32)> = sink.writes.iter().map(|&(x, y, _)| (x, y)).collect();
        assert_eq!(written, expected);
    }

    #[test]
    fn permissive_mode_writes_nan_pixels() {
        let scene = small_scene();
        let image = Renderer::with_primitive(&scene, &Poisoned).render().unwrap();
        assert!(image.pixels().all(|p| p.0.iter().any(|c| c.is_nan())));
    }

    #[test]
    fn strict_mode_reports_degenerate_pixels() {
        let mut scene = small_scene();
        scene.render.strict = true;
        let err = Renderer::with_primitive(&scene, &Poisoned).render().unwrap_err();
        assert!(
            matches!(
                err,
                RenderError::DegenerateGeometry {
                    kind: Degeneracy::NonFinite,
                    ..
                }
            ),
            "{err}"
        );
    }

    #[test]
    fn culling_turns_hits_behind_camera_into_background() {
        // Triangle behind the camera, crossing the backwards view axis.
        let mut scene = small_scene();
        scene.triangle = crate::triangle::Triangle::new(
            Vec3A::new(-5.0, -5.0, 3.0),
            Vec3A::new(5.0, -5.0, 3.0),
            Vec3A::new(0.0, 5.0, 3.0),
        );

        let center = Renderer::new(&scene).trace(8, 4).unwrap();
        assert_ne!(center, scene.background);

        scene.render.cull_behind_camera = true;
        let center = Renderer::new(&scene).trace(8, 4).unwrap();
        assert_eq!(center, scene.background);
    }

    #[test]
    fn unvalidated_zero_width_scene_is_an_error() {
        let scene = Scene {
            camera: CameraSettings {
                resolution: [0, 4],
                ..CameraSettings::default()
            },
            ..Scene::default()
        };
        let void = Void::default();
        let err = Renderer::with_primitive(&scene, &void).render().unwrap_err();
        assert!(matches!(err, RenderError::InvalidScene(_)), "{err}");
        assert_eq!(void.calls.load(Ordering::Relaxed), 0);

        let mut sink = Recorder::default();
        assert!(Renderer::new(&scene).render_to(&mut sink).is_err());
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn parallel_render_matches_sequential_trace() {
        let scene = small_scene();
        let renderer = Renderer::new(&scene);
        let image = renderer.render().unwrap();
        for (x, y, p) in image.enumerate_pixels() {
            let c = renderer.trace(x, y).unwrap();
            assert_eq!(p.0, [c.x, c.y, c.z], "({x}, {y})");
        }
    }
}
