//! Boundary between the streaming core and a rendering engine
//!
//! The engine owns the window, camera and draw loop. The core only needs to
//! replace the displayed points, add overlay markers and labels, read the
//! current zoom, and be called back once per draw cycle.

use crate::scene::Rgb;
use cloudstream_core::{Error, Point3f, Result};

/// Called once per draw cycle after the engine has drawn
///
/// The return value tells the engine whether the hook handled the cycle
/// itself; hooks that only update the scene return `false`.
pub type PostDrawHook = Box<dyn FnMut(&mut dyn SceneSink) -> bool + Send>;

/// Called once when the engine's run loop ends
pub type ShutdownHook = Box<dyn FnOnce() + Send>;

/// Scene operations the engine exposes to draw-cycle hooks
pub trait SceneSink {
    /// Replace all displayed points
    fn set_points(&mut self, positions: &[Point3f], colors: &[Rgb], radii: &[f32]) -> Result<()>;

    /// Append points with a shared color on top of the current set
    fn add_points(&mut self, positions: &[Point3f], color: Rgb, radii: &[f32]) -> Result<()>;

    /// Add a persistent text annotation
    fn add_label(&mut self, position: Point3f, text: &str) -> Result<()>;

    /// Remove every text annotation
    fn clear_labels(&mut self);

    /// Current camera zoom; may change between draw cycles
    fn camera_zoom(&self) -> f32;
}

/// A rendering engine with a blocking run loop
pub trait RenderEngine: SceneSink {
    fn register_post_draw_hook(&mut self, hook: PostDrawHook);

    fn register_shutdown_hook(&mut self, hook: ShutdownHook);

    /// Drive draw cycles until the engine decides to stop
    fn run(&mut self) -> Result<()>;
}

/// Check that parallel per-point arrays agree in length
pub fn check_lengths(positions: usize, colors: usize, radii: usize) -> Result<()> {
    if positions != colors || positions != radii {
        return Err(Error::Visualization(format!(
            "mismatched point arrays: {} positions, {} colors, {} radii",
            positions, colors, radii
        )));
    }
    Ok(())
}
