//! Error types for scene loading, rendering and image output.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Numerical degeneracy detected by strict-mode intersection tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// The ray is parallel to the triangle plane, so `1 / det` is not finite.
    ParallelRay,
    /// The normal recomputed at the hit point has zero length.
    ZeroAreaNormal,
    /// The intersection record or the shaded color contains NaN or infinity.
    NonFinite,
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Degeneracy::ParallelRay => "ray is parallel to the triangle plane",
            Degeneracy::ZeroAreaNormal => "surface normal has zero length",
            Degeneracy::NonFinite => "non-finite value in intersection or shading",
        };
        f.write_str(s)
    }
}

/// Everything that can go wrong between loading a scene and writing the image.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Reading the scene file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The scene file is not valid JSON or does not match the scene schema.
    #[error("scene description is not valid JSON: {0}")]
    SceneParse(#[from] serde_json::Error),
    /// The scene parses but describes an unusable camera or image.
    #[error("invalid scene: {0}")]
    InvalidScene(String),
    /// Strict mode found a numerical degeneracy while tracing a pixel.
    #[error("degenerate geometry at pixel ({x}, {y}): {kind}")]
    DegenerateGeometry {
        /// Pixel column
        x: u32,
        /// Pixel row
        y: u32,
        /// What went wrong
        kind: Degeneracy,
    },
    /// PNG encoding or file output failed.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
    /// EXR encoding or file output failed.
    #[error("failed to write EXR image: {0}")]
    Exr(#[from] exr::error::Error),
    /// The rayon pool for a fixed thread count could not be created.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// The output path has neither a `.png` nor an `.exr` extension.
    #[error("unsupported output extension '{0}', expected .png or .exr")]
    UnsupportedOutput(String),
}
