//! Scalar-to-color mapping for the startup placeholder

use crate::scene::Rgb;
use serde::{Deserialize, Serialize};

/// Coloring applied to the placeholder geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMap {
    /// Jet ramp over the Z coordinate
    Jet,
    /// Single flat color
    Solid(Rgb),
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::Jet
    }
}

impl ColorMap {
    /// Color every value, normalizing to the value range for `Jet`
    pub fn apply(&self, values: &[f32]) -> Vec<Rgb> {
        match self {
            ColorMap::Jet => jet_colors(values, true),
            ColorMap::Solid(color) => vec![*color; values.len()],
        }
    }
}

/// Jet color for a value in [0, 1]; out of range values are clamped
pub fn jet(value: f32) -> Rgb {
    const RED_PEAK: f32 = 0.8;
    let x = if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    };

    if x < 1.0 / 8.0 {
        [0.0, 0.0, 0.5 + 0.5 * x * 8.0]
    } else if x < 3.0 / 8.0 {
        [0.0, (x - 1.0 / 8.0) * 4.0, 1.0]
    } else if x < 5.0 / 8.0 {
        let t = (x - 3.0 / 8.0) * 4.0;
        [RED_PEAK * t, 1.0, 1.0 - t]
    } else if x < 7.0 / 8.0 {
        let t = (x - 5.0 / 8.0) * 4.0;
        [RED_PEAK + (1.0 - RED_PEAK) * t, 1.0 - t, 0.0]
    } else {
        [1.0 - (x - 7.0 / 8.0) * 4.0, 0.0, 0.0]
    }
}

/// Jet colors for a slice of scalars
///
/// With `normalize` the values are rescaled to their min/max range first;
/// a degenerate range maps everything to the middle of the ramp.
pub fn jet_colors(values: &[f32], normalize: bool) -> Vec<Rgb> {
    if !normalize {
        return values.iter().map(|&v| jet(v)).collect();
    }

    let (min, max) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;

    values
        .iter()
        .map(|&v| {
            if range > 0.0 {
                jet((v - min) / range)
            } else {
                jet(0.5)
            }
        })
        .collect()
}
