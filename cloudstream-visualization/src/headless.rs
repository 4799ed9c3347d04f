//! In-process rendering engine without a window
//!
//! Keeps the displayed points and labels in memory and drives post-draw
//! hooks at a fixed interval. The demo runs against it and the tests use it
//! to observe exactly what a real engine would have been asked to draw.

use crate::camera::Camera;
use crate::engine::{check_lengths, PostDrawHook, RenderEngine, SceneSink, ShutdownHook};
use crate::scene::Rgb;
use cloudstream_core::{Point3f, Result};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Everything currently on "screen"
#[derive(Debug, Default)]
pub struct HeadlessScene {
    pub camera: Camera,
    positions: Vec<Point3f>,
    colors: Vec<Rgb>,
    radii: Vec<f32>,
    labels: Vec<(Point3f, String)>,
    set_points_calls: usize,
}

impl HeadlessScene {
    pub fn positions(&self) -> &[Point3f] {
        &self.positions
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn radii(&self) -> &[f32] {
        &self.radii
    }

    pub fn labels(&self) -> &[(Point3f, String)] {
        &self.labels
    }

    /// Number of displayed points, overlay markers included
    pub fn point_count(&self) -> usize {
        self.positions.len()
    }

    /// How many times the point set was replaced
    pub fn set_points_calls(&self) -> usize {
        self.set_points_calls
    }
}

impl SceneSink for HeadlessScene {
    fn set_points(&mut self, positions: &[Point3f], colors: &[Rgb], radii: &[f32]) -> Result<()> {
        check_lengths(positions.len(), colors.len(), radii.len())?;
        self.positions = positions.to_vec();
        self.colors = colors.to_vec();
        self.radii = radii.to_vec();
        self.set_points_calls += 1;
        Ok(())
    }

    fn add_points(&mut self, positions: &[Point3f], color: Rgb, radii: &[f32]) -> Result<()> {
        check_lengths(positions.len(), positions.len(), radii.len())?;
        self.positions.extend_from_slice(positions);
        self.colors.extend(std::iter::repeat(color).take(positions.len()));
        self.radii.extend_from_slice(radii);
        Ok(())
    }

    fn add_label(&mut self, position: Point3f, text: &str) -> Result<()> {
        self.labels.push((position, text.to_string()));
        Ok(())
    }

    fn clear_labels(&mut self) {
        self.labels.clear();
    }

    fn camera_zoom(&self) -> f32 {
        self.camera.zoom
    }
}

/// Stops a running [`HeadlessEngine`] from any thread
#[derive(Debug, Clone)]
pub struct EngineHandle {
    quit: Arc<AtomicBool>,
}

impl EngineHandle {
    pub fn quit(&self) {
        self.quit.store(true, Ordering::Release);
    }

    pub fn is_quit(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }
}

/// Windowless engine with a fixed-rate draw loop
pub struct HeadlessEngine {
    scene: HeadlessScene,
    hooks: Vec<PostDrawHook>,
    shutdown_hooks: Vec<ShutdownHook>,
    frame_interval: Duration,
    max_cycles: Option<u64>,
    zoom_drift: f32,
    cycles: u64,
    quit: Arc<AtomicBool>,
}

impl HeadlessEngine {
    /// Create an engine that draws as fast as possible until quit
    pub fn new() -> Self {
        Self {
            scene: HeadlessScene::default(),
            hooks: Vec::new(),
            shutdown_hooks: Vec::new(),
            frame_interval: Duration::ZERO,
            max_cycles: None,
            zoom_drift: 1.0,
            cycles: 0,
            quit: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Sleep this long between draw cycles
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Stop after this many draw cycles
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    /// Multiply the camera zoom by `factor` before every cycle
    pub fn with_zoom_drift(mut self, factor: f32) -> Self {
        self.zoom_drift = factor;
        self
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.scene.camera = camera;
        self
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            quit: self.quit.clone(),
        }
    }

    pub fn scene(&self) -> &HeadlessScene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut HeadlessScene {
        &mut self.scene
    }

    /// Draw cycles completed so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run a single draw cycle and its post-draw hooks
    pub fn step(&mut self) {
        if self.zoom_drift != 1.0 {
            self.scene.camera.zoom_by(self.zoom_drift);
        }
        for hook in &mut self.hooks {
            hook(&mut self.scene);
        }
        self.cycles += 1;
    }

    fn should_stop(&self) -> bool {
        self.quit.load(Ordering::Acquire)
            || self.max_cycles.is_some_and(|max| self.cycles >= max)
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneSink for HeadlessEngine {
    fn set_points(&mut self, positions: &[Point3f], colors: &[Rgb], radii: &[f32]) -> Result<()> {
        self.scene.set_points(positions, colors, radii)
    }

    fn add_points(&mut self, positions: &[Point3f], color: Rgb, radii: &[f32]) -> Result<()> {
        self.scene.add_points(positions, color, radii)
    }

    fn add_label(&mut self, position: Point3f, text: &str) -> Result<()> {
        self.scene.add_label(position, text)
    }

    fn clear_labels(&mut self) {
        self.scene.clear_labels();
    }

    fn camera_zoom(&self) -> f32 {
        self.scene.camera_zoom()
    }
}

impl RenderEngine for HeadlessEngine {
    fn register_post_draw_hook(&mut self, hook: PostDrawHook) {
        self.hooks.push(hook);
    }

    fn register_shutdown_hook(&mut self, hook: ShutdownHook) {
        self.shutdown_hooks.push(hook);
    }

    fn run(&mut self) -> Result<()> {
        info!(
            "Headless engine running ({} hooks, interval {:?}, max cycles {:?})",
            self.hooks.len(),
            self.frame_interval,
            self.max_cycles
        );

        while !self.should_stop() {
            self.step();
            if !self.frame_interval.is_zero() {
                std::thread::sleep(self.frame_interval);
            }
        }

        debug!("Headless engine stopped after {} cycles", self.cycles);
        for hook in self.shutdown_hooks.drain(..) {
            hook();
        }
        Ok(())
    }
}
