use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use trishade::{Footprint, PixelSampling, Scene};

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser, Debug)]
#[command(name = "trishade")]
#[command(about = "Ray cast a Phong-shaded triangle under a point light")]
pub struct Args {
    /// Scene description in JSON; missing fields use the reference scene
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Output file path (.png for 8-bit, .exr for HDR linear)
    #[arg(short, long, default_value = "output.png")]
    pub output: String,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub debug_level: LogLevel,

    /// Number of render threads (defaults to one per CPU)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Fail on degenerate geometry instead of writing NaN pixels
    #[arg(long)]
    pub strict: bool,

    /// Sample true pixel centers instead of the reference half-pixel shift
    #[arg(long)]
    pub centered: bool,

    /// Write 1x1 pixels instead of the reference 1x2 blocks
    #[arg(long)]
    pub single_footprint: bool,

    /// Ignore intersections behind the camera
    #[arg(long)]
    pub cull: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Time a single-threaded render against the full thread pool
    #[arg(long)]
    pub bench: bool,
}

impl Args {
    /// Apply flag overrides on top of the loaded scene.
    pub fn apply(&self, scene: &mut Scene) {
        if self.strict {
            scene.render.strict = true;
        }
        if self.cull {
            scene.render.cull_behind_camera = true;
        }
        if self.centered {
            scene.camera.sampling = PixelSampling::Centered;
        }
        if self.single_footprint {
            scene.output.footprint = Footprint::Single;
        }
    }
}
