//! Live point-cloud visualization
//!
//! This crate bridges an asynchronous point-cloud producer and a real-time
//! render loop:
//! - [`FrameBuffer`]: single-slot, last-write-wins frame exchange
//! - [`SceneBuilder`]: cloud snapshot to point/color/radius arrays plus axis overlay
//! - [`RenderLoopAdapter`]: per-draw-cycle hook driving the conversion
//! - [`Bootstrap`]: startup sequence ending in the engine's run loop
//!
//! The rendering engine is abstracted behind [`RenderEngine`]; [`HeadlessEngine`]
//! is a windowless implementation.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cloudstream_core::{ColoredPoint3f, ColoredPointCloud3f};
//! use cloudstream_visualization::{Bootstrap, FrameBuffer, HeadlessEngine, ViewerConfig};
//!
//! fn main() -> cloudstream_core::Result<()> {
//!     let frames = Arc::new(FrameBuffer::new());
//!     let mut engine = HeadlessEngine::new();
//!
//!     Bootstrap::new(ViewerConfig::default()).launch(&mut engine, frames, |producer| {
//!         while !producer.is_shutdown() {
//!             let point = ColoredPoint3f::new(0.0, 0.0, 0.0, [255, 0, 0, 255]);
//!             let cloud: ColoredPointCloud3f = vec![point].into_iter().collect();
//!             producer.publish_owned(cloud);
//!         }
//!     })
//! }
//! ```

pub mod adapter;
pub mod bootstrap;
pub mod camera;
pub mod colormap;
pub mod config;
pub mod engine;
pub mod frame_buffer;
pub mod headless;
pub mod scene;

pub use adapter::{push_scene, RedrawPolicy, RenderLoopAdapter};
pub use bootstrap::{show_placeholder, Bootstrap, Placeholder, Producer, ShutdownToken};
pub use camera::Camera;
pub use colormap::{jet, jet_colors, ColorMap};
pub use config::{ConfigLoader, ViewerConfig};
pub use engine::{PostDrawHook, RenderEngine, SceneSink, ShutdownHook};
pub use frame_buffer::FrameBuffer;
pub use headless::{EngineHandle, HeadlessEngine, HeadlessScene};
pub use scene::{build_scene, Label, Overlay, PointVertex, Rgb, SceneBuilder, SceneData};
