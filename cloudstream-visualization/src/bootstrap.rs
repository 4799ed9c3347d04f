//! One-time startup: placeholder geometry, hook registration, producer
//! thread, then hand-off to the engine's blocking run loop.

use crate::adapter::RenderLoopAdapter;
use crate::config::ViewerConfig;
use crate::engine::{RenderEngine, SceneSink};
use crate::frame_buffer::FrameBuffer;
use crate::scene::{normalize_rgb, Rgb, SceneBuilder};
use cloudstream_core::{ColoredPointCloud3f, Error, Point3f, Result, TriangleMesh};
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Radius multiplier for the placeholder points
pub const PLACEHOLDER_POINT_SIZE: f32 = 0.01;

/// Name of the producer thread spawned by [`Bootstrap::launch`]
pub const PRODUCER_THREAD_NAME: &str = "cloudstream-producer";

/// Cooperative stop signal for the producer, raised when the engine exits
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    cancelled: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// What the producer context receives: somewhere to publish and a stop signal
#[derive(Debug, Clone)]
pub struct Producer {
    frames: Arc<FrameBuffer>,
    shutdown: ShutdownToken,
}

impl Producer {
    pub fn new(frames: Arc<FrameBuffer>, shutdown: ShutdownToken) -> Self {
        Self { frames, shutdown }
    }

    /// Publish a copy of `cloud` as the latest frame
    pub fn publish(&self, cloud: &ColoredPointCloud3f) -> Result<()> {
        self.frames.publish(cloud)
    }

    /// Publish `cloud` without copying
    pub fn publish_owned(&self, cloud: ColoredPointCloud3f) {
        self.frames.publish_owned(cloud)
    }

    /// Whether the render loop has ended and the producer should stop
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    pub fn frames(&self) -> &Arc<FrameBuffer> {
        &self.frames
    }
}

/// Points shown before the first frame
#[derive(Debug, Clone)]
pub struct Placeholder {
    pub positions: Vec<Point3f>,
    pub colors: Vec<Rgb>,
}

/// Startup sequence for the live viewer
pub struct Bootstrap {
    config: ViewerConfig,
}

impl Bootstrap {
    pub fn new(config: ViewerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Load and color the placeholder geometry
    ///
    /// Uses `initial_mesh` when configured, otherwise the corners of a unit
    /// cube. Per-vertex mesh colors (COFF) are kept as they are; anything
    /// else is colored by the configured colormap over the Z coordinate.
    pub fn load_placeholder(&self) -> Result<Placeholder> {
        let mesh = match &self.config.initial_mesh {
            Some(path) => {
                info!("Loading placeholder mesh {}", path.display());
                cloudstream_io::read_mesh(path)?
            }
            None => unit_cube(),
        };
        if mesh.is_empty() {
            return Err(Error::InvalidData("placeholder mesh has no vertices".to_string()));
        }

        let colors = match &mesh.colors {
            Some(colors) if colors.len() == mesh.vertices.len() => {
                colors.iter().map(|&c| normalize_rgb(c)).collect()
            }
            _ => {
                let heights: Vec<f32> = mesh.vertices.iter().map(|v| v.z).collect();
                self.config.placeholder_colormap.apply(&heights)
            }
        };
        Ok(Placeholder {
            positions: mesh.vertices,
            colors,
        })
    }

    /// Scene builder and adapter configured from the viewer settings
    pub fn adapter(&self, frames: Arc<FrameBuffer>) -> RenderLoopAdapter {
        let builder = SceneBuilder::new(self.config.point_scale)
            .with_marker_scale(self.config.marker_scale);
        RenderLoopAdapter::new(frames, builder).with_policy(self.config.redraw_policy)
    }

    /// Run the whole startup sequence and block in `engine.run()`
    ///
    /// `producer` runs on its own thread with a [`Producer`] handle; it
    /// should return once [`Producer::is_shutdown`] turns true, which
    /// happens when the engine's run loop ends.
    pub fn launch<E, F>(self, engine: &mut E, frames: Arc<FrameBuffer>, producer: F) -> Result<()>
    where
        E: RenderEngine,
        F: FnOnce(Producer) + Send + 'static,
    {
        self.config.validate()?;

        let placeholder = self.load_placeholder()?;
        show_placeholder(engine, &placeholder)?;
        info!("Placeholder shown ({} points)", placeholder.positions.len());

        engine.register_post_draw_hook(self.adapter(frames.clone()).into_hook());

        let shutdown = ShutdownToken::new();
        let handle = Producer::new(frames, shutdown.clone());
        thread::Builder::new()
            .name(PRODUCER_THREAD_NAME.to_string())
            .spawn(move || producer(handle))?;
        engine.register_shutdown_hook(Box::new(move || shutdown.cancel()));

        info!("Handing control to the render loop");
        engine.run()
    }
}

/// Display the placeholder at a zoom-scaled radius
pub fn show_placeholder(sink: &mut dyn SceneSink, placeholder: &Placeholder) -> Result<()> {
    let radius = PLACEHOLDER_POINT_SIZE * sink.camera_zoom();
    let radii = vec![radius; placeholder.positions.len()];
    sink.set_points(&placeholder.positions, &placeholder.colors, &radii)
}

fn unit_cube() -> TriangleMesh {
    let vertices = (0..8)
        .map(|i| {
            Point3f::new(
                (i & 1) as f32 - 0.5,
                ((i >> 1) & 1) as f32 - 0.5,
                ((i >> 2) & 1) as f32 - 0.5,
            )
        })
        .collect();
    TriangleMesh::from_vertices_and_faces(vertices, Vec::new())
}
