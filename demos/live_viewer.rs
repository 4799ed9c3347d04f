//! Live viewer demo
//!
//! Streams a synthetic, continuously deforming point cloud from a producer
//! thread into the headless render loop. Run with `--debug` (or
//! `RUST_LOG=debug`) to see every conversion.

use anyhow::{Context, Result};
use clap::Parser;
use cloudstream_core::{ColoredPoint3f, ColoredPointCloud3f};
use cloudstream_visualization::{
    Bootstrap, ConfigLoader, FrameBuffer, HeadlessEngine, Producer, RedrawPolicy, RenderEngine,
};
use env_logger::Env;
use log::{error, info};
use rand::Rng;
use std::f32::consts::PI;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(
    name = "live_viewer",
    version,
    about = "Stream synthetic point clouds into a render loop"
)]
struct Cli {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base point radius multiplier
    #[arg(long)]
    point_scale: Option<f32>,

    /// OFF or OBJ mesh shown before the first frame
    #[arg(long)]
    initial_mesh: Option<PathBuf>,

    /// on_publish, on_publish_or_zoom or every_cycle
    #[arg(long)]
    policy: Option<RedrawPolicy>,

    /// Draw cycles before the render loop exits
    #[arg(long, default_value_t = 600)]
    cycles: u64,

    /// Frames published per second
    #[arg(long, default_value_t = 30.0)]
    producer_hz: f64,

    /// Points per published frame
    #[arg(long, default_value_t = 20_000)]
    points: usize,

    /// Camera zoom factor applied every draw cycle
    #[arg(long, default_value_t = 1.0)]
    zoom_drift: f32,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logger(Env::default().default_filter_or("info"), cli.debug).init();

    info!("cloudstream live viewer v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config =
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(scale) = cli.point_scale {
        config.point_scale = scale;
    }
    if let Some(mesh) = cli.initial_mesh {
        config.initial_mesh = Some(mesh);
    }
    if let Some(policy) = cli.policy {
        config.redraw_policy = policy;
    }
    config.validate().context("Invalid configuration")?;

    let frames = Arc::new(FrameBuffer::new());
    let mut engine = HeadlessEngine::new()
        .with_frame_interval(Duration::from_millis(config.frame_interval_ms))
        .with_max_cycles(cli.cycles)
        .with_zoom_drift(cli.zoom_drift);

    let summary = frames.clone();
    engine.register_shutdown_hook(Box::new(move || {
        info!("Render loop finished after {} published frames", summary.generation());
    }));

    let points = cli.points;
    let period = Duration::from_secs_f64(1.0 / cli.producer_hz.max(0.001));
    Bootstrap::new(config)
        .launch(&mut engine, frames, move |producer| run_producer(producer, points, period))
        .map_err(|e| {
            error!("Viewer failed: {}", e);
            e
        })
        .context("Viewer failed")
}

/// Logger honoring `RUST_LOG`, with `--debug` forcing the debug level
fn logger(env: Env<'_>, debug: bool) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_env(env);
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder
}

/// Publish a deforming sphere every `period` until the render loop ends
fn run_producer(producer: Producer, points: usize, period: Duration) {
    let mut rng = rand::thread_rng();
    let started = Instant::now();
    let mut frame = 0u64;

    while !producer.is_shutdown() {
        let t = started.elapsed().as_secs_f32();
        let cloud = wobbling_sphere(points, t, &mut rng);
        producer.publish_owned(cloud);

        frame += 1;
        if frame % 100 == 0 {
            info!("Producer published {} frames", frame);
        }
        std::thread::sleep(period);
    }

    info!("Producer stopping after {} frames", frame);
}

/// Fibonacci sphere whose radius ripples over time, colored by direction
fn wobbling_sphere<R: Rng>(n: usize, t: f32, rng: &mut R) -> ColoredPointCloud3f {
    let golden_angle = PI * (3.0 - 5.0_f32.sqrt());

    (0..n)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f32 + 0.5) / n.max(1) as f32;
            let ring = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden_angle * i as f32;
            let (x, z) = (ring * theta.cos(), ring * theta.sin());

            let radius = 1.0 + 0.1 * (4.0 * y + 2.0 * t).sin() + rng.gen_range(-0.005..0.005);
            let channel = |v: f32| ((v * 0.5 + 0.5) * 255.0) as u8;

            ColoredPoint3f::new(
                x * radius,
                y * radius,
                z * radius,
                [channel(x), channel(y), channel(z), 255],
            )
        })
        .collect()
}
