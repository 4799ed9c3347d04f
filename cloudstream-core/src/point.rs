//! Point types and related functionality

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use bytemuck::{Pod, Zeroable};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// 8-bit RGBA color as produced by sensors and reconstruction pipelines
pub type Rgba8 = [u8; 4];

/// A point with RGBA color information
///
/// The layout is packed (12 bytes of position followed by 4 color bytes)
/// so producers can hand over raw buffers, see
/// [`PointCloud::from_bytes`](crate::PointCloud::from_bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct ColoredPoint3f {
    pub position: Point3f,
    pub color: Rgba8,
}

unsafe impl Pod for ColoredPoint3f {}
unsafe impl Zeroable for ColoredPoint3f {}

impl ColoredPoint3f {
    /// Create a colored point from coordinates and an RGBA color
    pub fn new(x: f32, y: f32, z: f32, color: Rgba8) -> Self {
        Self {
            position: Point3f::new(x, y, z),
            color,
        }
    }

    /// Red, green and blue channels, alpha dropped
    pub fn rgb(&self) -> [u8; 3] {
        [self.color[0], self.color[1], self.color[2]]
    }

    /// Alpha channel
    pub fn alpha(&self) -> u8 {
        self.color[3]
    }
}

impl Default for ColoredPoint3f {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            color: [255, 255, 255, 255],
        }
    }
}

/// `(x, y, z, r, g, b, a)` tuples are the producer-facing point format
impl From<(f32, f32, f32, u8, u8, u8, u8)> for ColoredPoint3f {
    fn from((x, y, z, r, g, b, a): (f32, f32, f32, u8, u8, u8, u8)) -> Self {
        Self::new(x, y, z, [r, g, b, a])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_conversion() {
        let p = ColoredPoint3f::from((1.0, 2.0, 3.0, 10, 20, 30, 40));
        assert_eq!(p.position, Point3f::new(1.0, 2.0, 3.0));
        assert_eq!(p.rgb(), [10, 20, 30]);
        assert_eq!(p.alpha(), 40);
    }

    #[test]
    fn test_packed_layout() {
        assert_eq!(std::mem::size_of::<ColoredPoint3f>(), 16);
    }
}
