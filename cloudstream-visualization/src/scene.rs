//! Conversion of a point cloud snapshot into renderer primitives

use bytemuck::{Pod, Zeroable};
use cloudstream_core::{ColoredPointCloud3f, Point3f, Result};

/// Linear RGB color with channels in [0, 1]
pub type Rgb = [f32; 3];

/// Radius multiplier for axis markers relative to ordinary points
pub const DEFAULT_MARKER_SCALE: f32 = 10.0;

/// Axis markers are drawn in red
pub const DEFAULT_MARKER_COLOR: Rgb = [1.0, 0.0, 0.0];

/// A text annotation anchored at a point in space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Label {
    pub position: Point3f,
    pub text: &'static str,
}

/// Fixed axis overlay: markers at origin/x/y/z and their labels
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub markers: [Point3f; 4],
    pub marker_color: Rgb,
    pub marker_radius: f32,
    pub labels: [Label; 4],
}

impl Overlay {
    fn new(marker_color: Rgb, marker_radius: f32) -> Self {
        let origin = Point3f::origin();
        let x = Point3f::new(1.0, 0.0, 0.0);
        let y = Point3f::new(0.0, 1.0, 0.0);
        let z = Point3f::new(0.0, 0.0, 1.0);

        Self {
            markers: [origin, x, y, z],
            marker_color,
            marker_radius,
            labels: [
                Label { position: x, text: "x" },
                Label { position: y, text: "y" },
                Label { position: z, text: "z" },
                Label { position: origin, text: "centre" },
            ],
        }
    }

    /// One radius per marker
    pub fn marker_radii(&self) -> [f32; 4] {
        [self.marker_radius; 4]
    }

    /// Pack the markers as interleaved vertices
    pub fn vertices(&self) -> Vec<PointVertex> {
        self.markers
            .iter()
            .map(|p| PointVertex::new(p, self.marker_color, self.marker_radius))
            .collect()
    }
}

/// Renderer-ready primitives for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct SceneData {
    pub positions: Vec<Point3f>,
    pub colors: Vec<Rgb>,
    pub radii: Vec<f32>,
    pub overlay: Overlay,
}

impl SceneData {
    /// Number of ordinary (non-overlay) points
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Pack the ordinary points as interleaved vertices
    pub fn vertices(&self) -> Vec<PointVertex> {
        self.positions
            .iter()
            .zip(&self.colors)
            .zip(&self.radii)
            .map(|((p, &c), &r)| PointVertex::new(p, c, r))
            .collect()
    }
}

/// Interleaved vertex layout for GPU upload
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub size: f32,
}

impl PointVertex {
    pub fn new(point: &Point3f, color: Rgb, size: f32) -> Self {
        Self {
            position: [point.x, point.y, point.z],
            color,
            size,
        }
    }
}

/// Builds [`SceneData`] from cloud snapshots
///
/// Every ordinary point gets the same radius, `point_scale * camera_zoom`;
/// axis markers get `marker_scale` times that.
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    pub point_scale: f32,
    pub marker_scale: f32,
    pub marker_color: Rgb,
}

impl SceneBuilder {
    pub fn new(point_scale: f32) -> Self {
        Self {
            point_scale,
            marker_scale: DEFAULT_MARKER_SCALE,
            marker_color: DEFAULT_MARKER_COLOR,
        }
    }

    pub fn with_marker_scale(mut self, marker_scale: f32) -> Self {
        self.marker_scale = marker_scale;
        self
    }

    pub fn with_marker_color(mut self, marker_color: Rgb) -> Self {
        self.marker_color = marker_color;
        self
    }

    /// Radius of an ordinary point at the given zoom
    pub fn point_radius(&self, camera_zoom: f32) -> f32 {
        self.point_scale * camera_zoom
    }

    /// Convert `cloud` into primitives
    ///
    /// Positions are copied verbatim, 8-bit channels are divided by 255 and
    /// alpha is dropped. An empty cloud still yields the full overlay.
    pub fn build(&self, cloud: &ColoredPointCloud3f, camera_zoom: f32) -> Result<SceneData> {
        let n = cloud.len();
        let radius = self.point_radius(camera_zoom);

        let mut positions = Vec::new();
        let mut colors = Vec::new();
        let mut radii = Vec::new();
        positions.try_reserve_exact(n)?;
        colors.try_reserve_exact(n)?;
        radii.try_reserve_exact(n)?;

        for point in cloud {
            positions.push(point.position);
            colors.push(normalize_rgb(point.rgb()));
        }
        radii.resize(n, radius);

        Ok(SceneData {
            positions,
            colors,
            radii,
            overlay: Overlay::new(self.marker_color, radius * self.marker_scale),
        })
    }
}

/// Build a scene with the default overlay settings
pub fn build_scene(
    cloud: &ColoredPointCloud3f,
    point_scale: f32,
    camera_zoom: f32,
) -> Result<SceneData> {
    SceneBuilder::new(point_scale).build(cloud, camera_zoom)
}

/// Map 8-bit channels into [0, 1]
pub fn normalize_rgb(rgb: [u8; 3]) -> Rgb {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    ]
}
