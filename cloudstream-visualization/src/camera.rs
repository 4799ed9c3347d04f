//! Camera state read by the render loop

/// Smallest zoom the camera will accept
pub const MIN_ZOOM: f32 = 1e-3;

/// Largest zoom the camera will accept
pub const MAX_ZOOM: f32 = 1e3;

/// Zoom-only camera model
///
/// Point radii are scaled by the zoom so points keep a stable on-screen
/// size; everything else about the view belongs to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub zoom: f32,
    pub default_zoom: f32,
}

impl Camera {
    /// Create a camera with the given starting zoom
    pub fn new(zoom: f32) -> Self {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        Self {
            zoom,
            default_zoom: zoom,
        }
    }

    /// Multiply the zoom by `factor`, clamped to the supported range
    pub fn zoom_by(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Set an absolute zoom, clamped to the supported range
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Return to the starting zoom
    pub fn reset(&mut self) {
        self.zoom = self.default_zoom;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.zoom_by(1e9);
        assert_eq!(camera.zoom, MAX_ZOOM);
        camera.set_zoom(0.0);
        assert_eq!(camera.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_invalid_factor_ignored() {
        let mut camera = Camera::new(2.0);
        camera.zoom_by(-1.0);
        camera.zoom_by(f32::NAN);
        assert_eq!(camera.zoom, 2.0);
        camera.zoom_by(0.5);
        camera.reset();
        assert_eq!(camera.zoom, 2.0);
    }
}
