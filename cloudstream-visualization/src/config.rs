//! Viewer configuration
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. A JSON configuration file (explicit path or `CLOUDSTREAM_CONFIG`)
//! 3. Environment variables (`CLOUDSTREAM_POINT_SCALE`, `CLOUDSTREAM_INITIAL_MESH`,
//!    `CLOUDSTREAM_REDRAW_POLICY`)
//!
//! Command-line flags are applied on top by the binary.

use crate::adapter::RedrawPolicy;
use crate::colormap::ColorMap;
use crate::scene::DEFAULT_MARKER_SCALE;
use cloudstream_core::{Error, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for the live viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Base radius multiplier for ordinary points
    #[serde(default = "default_point_scale")]
    pub point_scale: f32,
    /// Mesh shown before the first frame arrives (OFF or OBJ)
    #[serde(default)]
    pub initial_mesh: Option<PathBuf>,
    #[serde(default)]
    pub redraw_policy: RedrawPolicy,
    #[serde(default)]
    pub placeholder_colormap: ColorMap,
    /// Axis marker radius relative to ordinary points
    #[serde(default = "default_marker_scale")]
    pub marker_scale: f32,
    /// Pause between draw cycles of the headless engine
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

fn default_point_scale() -> f32 {
    0.02
}

fn default_marker_scale() -> f32 {
    DEFAULT_MARKER_SCALE
}

fn default_frame_interval_ms() -> u64 {
    16
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            point_scale: default_point_scale(),
            initial_mesh: None,
            redraw_policy: RedrawPolicy::default(),
            placeholder_colormap: ColorMap::default(),
            marker_scale: default_marker_scale(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl ViewerConfig {
    /// Reject scales that would produce invisible or invalid radii
    pub fn validate(&self) -> Result<()> {
        if !(self.point_scale.is_finite() && self.point_scale > 0.0) {
            return Err(Error::Config(format!(
                "point_scale must be a positive number, got {}",
                self.point_scale
            )));
        }
        if !(self.marker_scale.is_finite() && self.marker_scale > 0.0) {
            return Err(Error::Config(format!(
                "marker_scale must be a positive number, got {}",
                self.marker_scale
            )));
        }
        Ok(())
    }
}

/// Configuration loader with file and environment sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from `path` (or `CLOUDSTREAM_CONFIG`, or defaults), apply
    /// environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<ViewerConfig> {
        let env_path = env::var_os("CLOUDSTREAM_CONFIG").map(PathBuf::from);
        let mut config = match path.or(env_path.as_deref()) {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                debug!("No configuration file given, using defaults");
                ViewerConfig::default()
            }
        };

        Self::apply_environment_variables(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration file
    pub fn load_from_file(path: &Path) -> Result<ViewerConfig> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    /// Apply `CLOUDSTREAM_*` environment variable overrides
    pub fn apply_environment_variables(config: &mut ViewerConfig) {
        Self::apply_overrides(config, |key| env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Unparsable values are logged and ignored.
    pub fn apply_overrides<F>(config: &mut ViewerConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(scale) = lookup("CLOUDSTREAM_POINT_SCALE") {
            match scale.trim().parse() {
                Ok(scale) => config.point_scale = scale,
                Err(_) => warn!("Ignoring CLOUDSTREAM_POINT_SCALE={:?}", scale),
            }
        }

        if let Some(mesh) = lookup("CLOUDSTREAM_INITIAL_MESH") {
            config.initial_mesh = if mesh.is_empty() {
                None
            } else {
                Some(PathBuf::from(mesh))
            };
        }

        if let Some(policy) = lookup("CLOUDSTREAM_REDRAW_POLICY") {
            match policy.parse() {
                Ok(policy) => config.redraw_policy = policy,
                Err(e) => warn!("Ignoring CLOUDSTREAM_REDRAW_POLICY: {}", e),
            }
        }
    }
}
