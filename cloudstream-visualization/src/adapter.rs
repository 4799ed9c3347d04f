//! Draw-cycle hook bridging the engine loop to the frame buffer

use crate::engine::{PostDrawHook, SceneSink};
use crate::frame_buffer::FrameBuffer;
use crate::scene::{SceneBuilder, SceneData};
use cloudstream_core::{ColoredPointCloud3f, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// When a draw cycle reconverts the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedrawPolicy {
    /// Only after a new publish
    #[default]
    OnPublish,
    /// After a new publish, or when the camera zoom changed since the last conversion
    OnPublishOrZoom,
    /// Every cycle, whether or not anything changed
    EveryCycle,
}

impl std::str::FromStr for RedrawPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "on_publish" => Ok(Self::OnPublish),
            "on_publish_or_zoom" => Ok(Self::OnPublishOrZoom),
            "every_cycle" => Ok(Self::EveryCycle),
            other => Err(format!("unknown redraw policy '{}'", other)),
        }
    }
}

/// Converts dirty frames into scene updates once per draw cycle
pub struct RenderLoopAdapter {
    frames: Arc<FrameBuffer>,
    builder: SceneBuilder,
    policy: RedrawPolicy,
    last_zoom: Option<f32>,
    conversions: u64,
}

impl RenderLoopAdapter {
    pub fn new(frames: Arc<FrameBuffer>, builder: SceneBuilder) -> Self {
        Self {
            frames,
            builder,
            policy: RedrawPolicy::default(),
            last_zoom: None,
            conversions: 0,
        }
    }

    pub fn with_policy(mut self, policy: RedrawPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Number of completed conversions
    pub fn conversions(&self) -> u64 {
        self.conversions
    }

    /// Engine entry point; never claims the cycle, so always returns `false`
    ///
    /// Conversion errors are logged and leave the frame dirty for the next
    /// cycle.
    pub fn on_draw_cycle(&mut self, sink: &mut dyn SceneSink) -> bool {
        if let Err(e) = self.draw_cycle(sink) {
            error!("Frame conversion failed, retrying next cycle: {}", e);
        }
        false
    }

    /// Run one cycle, returning whether a conversion happened
    pub fn draw_cycle(&mut self, sink: &mut dyn SceneSink) -> Result<bool> {
        // Zoom is read fresh every cycle
        let zoom = sink.camera_zoom();
        let frames = &self.frames;
        let builder = &self.builder;
        let convert = |cloud: &ColoredPointCloud3f| -> Result<usize> {
            let scene = builder.build(cloud, zoom)?;
            push_scene(sink, &scene)?;
            Ok(scene.len())
        };

        let converted = match self.policy {
            RedrawPolicy::OnPublish => frames.with_current_if_dirty(convert)?,
            RedrawPolicy::OnPublishOrZoom if self.last_zoom != Some(zoom) => {
                Some(frames.with_current(convert)?)
            }
            RedrawPolicy::OnPublishOrZoom => frames.with_current_if_dirty(convert)?,
            RedrawPolicy::EveryCycle => Some(frames.with_current(convert)?),
        };

        match converted {
            Some(points) => {
                self.last_zoom = Some(zoom);
                self.conversions += 1;
                debug!("Compute cloud {} (zoom {})", points, zoom);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Wrap the adapter as an engine hook that owns it
    pub fn into_hook(mut self) -> PostDrawHook {
        Box::new(move |sink: &mut dyn SceneSink| self.on_draw_cycle(sink))
    }
}

/// Replace the displayed points with `scene` and redraw the overlay
pub fn push_scene(sink: &mut dyn SceneSink, scene: &SceneData) -> Result<()> {
    sink.set_points(&scene.positions, &scene.colors, &scene.radii)?;

    let overlay = &scene.overlay;
    sink.add_points(&overlay.markers, overlay.marker_color, &overlay.marker_radii())?;
    sink.clear_labels();
    for label in &overlay.labels {
        sink.add_label(label.position, label.text)?;
    }
    Ok(())
}
