use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{error, info, warn};

use trishade::output::save_exr;
use trishade::{Canvas, Framebuffer, RenderError, Renderer, Scene};

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;

fn main() -> ExitCode {
    let args = Args::parse();

    init_logger(args.debug_level.into());

    // Log application startup with version information
    info!("trishade - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Output format picked from the file extension.
enum Format {
    Png,
    Exr,
}

fn output_format(path: &str) -> Result<Format, RenderError> {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    match extension.to_ascii_lowercase().as_str() {
        "png" => Ok(Format::Png),
        "exr" => Ok(Format::Exr),
        _ => Err(RenderError::UnsupportedOutput(extension.to_string())),
    }
}

fn run(args: &Args) -> Result<(), RenderError> {
    let mut scene = match &args.scene {
        Some(path) => Scene::load(path)?,
        None => Scene::default(),
    };
    args.apply(&mut scene);
    scene.validate()?;

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    if args.bench {
        return run_benchmark(&scene);
    }

    let format = output_format(&args.output)?;
    info!("Image resolution: {}x{}", scene.width(), scene.height());
    if scene.render.strict {
        info!("Strict mode: degenerate geometry aborts the render");
    }

    let renderer = Renderer::new(&scene).with_progress(!args.no_progress);
    match format {
        Format::Png => {
            let mut canvas = Canvas::new(scene.width(), scene.height(), scene.output.footprint);
            renderer.render_to(&mut canvas)?;
            canvas.save_png(&args.output)?;
        }
        Format::Exr => {
            let image = renderer.render()?;
            save_exr(&image, &args.output)?;
        }
    }
    Ok(())
}

/// Bitwise comparison, so NaN pixels compare equal to themselves.
fn same_pixels(a: &Framebuffer, b: &Framebuffer) -> bool {
    a.dimensions() == b.dimensions()
        && a.as_raw()
            .iter()
            .zip(b.as_raw())
            .all(|(x, y)| x.to_bits() == y.to_bits())
}

/// Time a single-threaded render against the full pool and check both
/// produce the same image.
fn run_benchmark(scene: &Scene) -> Result<(), RenderError> {
    info!("Starting benchmark mode - comparing single-threaded and parallel rendering");

    let renderer = Renderer::new(scene);
    let single = rayon::ThreadPoolBuilder::new().num_threads(1).build()?;

    let start = Instant::now();
    let sequential = single.install(|| renderer.render())?;
    let sequential_time = start.elapsed();

    let start = Instant::now();
    let parallel = renderer.render()?;
    let parallel_time = start.elapsed();

    let speedup = sequential_time.as_secs_f32() / parallel_time.as_secs_f32();
    info!("================== BENCHMARK RESULTS ==================");
    info!("Resolution: {}x{}", scene.width(), scene.height());
    info!("-------------------------------------------------------");
    info!("1 thread:     {:>8.2?}      1.0x", sequential_time);
    info!(
        "{:<3} threads:  {:>8.2?}    {:>5.1}x",
        rayon::current_num_threads(),
        parallel_time,
        speedup
    );
    info!("=======================================================");

    if same_pixels(&sequential, &parallel) {
        info!("Parallel and single-threaded images are identical");
    } else {
        warn!("Parallel and single-threaded images differ");
    }
    Ok(())
}
