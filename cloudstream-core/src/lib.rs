//! Core data structures for cloudstream
//!
//! This crate provides the value types shared by producers and the render
//! side: colored points, point clouds, the placeholder mesh and the common
//! error type.

pub mod point;
pub mod point_cloud;
pub mod mesh;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use mesh::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
