//! Tunable parameters for square detection.
//!
//! Every empirical constant of the pipeline lives here with its default.
//! The defaults are calibrated together (circularity band, nesting ratio,
//! approximation tolerance); change them as a set and only with evidence.
//!
//! ```no_run
//! use minsquare::DetectorConfig;
//! use std::path::Path;
//!
//! let config = DetectorConfig::from_json_file(Path::new("detector.json"))?;
//! let config = config.with_thresholds(40.0, 120.0);
//! # Ok::<(), minsquare::DetectError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DetectError, Result};

/// Complete configuration for one detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DetectorConfig {
    pub edges: EdgeConfig,
    pub shape: ShapeCriteria,
    pub overlap: OverlapConfig,
    pub render: RenderConfig,
}

/// Preprocessing and edge detection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Canny hysteresis low threshold (gradient magnitude)
    pub low_threshold: f32,
    /// Canny hysteresis high threshold; pixels above it seed edges
    pub high_threshold: f32,
    /// Gaussian blur sigma; 1.1 matches a 5x5 kernel
    pub blur_sigma: f32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            low_threshold: 50.0,
            high_threshold: 150.0,
            blur_sigma: 1.1,
        }
    }
}

/// Acceptance tests a simplified contour must pass to become a square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeCriteria {
    /// Polygon approximation tolerance as a fraction of the contour perimeter
    pub approx_epsilon_ratio: f64,
    /// Allowed (longest - shortest) side, as a fraction of the shortest side
    pub side_tolerance: f64,
    /// Exclusive lower bound on 4*pi*area/perimeter^2
    pub circularity_min: f64,
    /// Exclusive upper bound on 4*pi*area/perimeter^2
    pub circularity_max: f64,
}

impl Default for ShapeCriteria {
    fn default() -> Self {
        Self {
            approx_epsilon_ratio: 0.04,
            side_tolerance: 0.1,
            circularity_min: 0.7,
            circularity_max: 0.85,
        }
    }
}

/// Nested-detection suppression parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlapConfig {
    /// A candidate is nested only inside one whose area exceeds this multiple of its own
    pub nest_area_ratio: f64,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self { nest_area_ratio: 1.5 }
    }
}

/// Output annotation styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub candidate_color: [u8; 3],
    pub candidate_thickness: u32,
    pub minimum_color: [u8; 3],
    pub minimum_thickness: u32,
    /// Text drawn next to the minimum square
    pub label: String,
    /// Gap in pixels between the first vertex and the label, on each axis
    pub label_offset: i32,
    /// Pixel size of one glyph cell
    pub label_scale: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            candidate_color: [0, 255, 0],
            candidate_thickness: 2,
            minimum_color: [255, 0, 0],
            minimum_thickness: 3,
            label: "MIN".to_string(),
            label_offset: 10,
            label_scale: 2,
        }
    }
}

impl DetectorConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON.
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn with_thresholds(mut self, low: f32, high: f32) -> Self {
        self.edges.low_threshold = low;
        self.edges.high_threshold = high;
        self
    }

    /// Check every parameter the pipeline depends on.
    pub fn validate(&self) -> Result<()> {
        let EdgeConfig {
            low_threshold: low,
            high_threshold: high,
            blur_sigma,
        } = self.edges;
        if !low.is_finite() || !high.is_finite() || low < 0.0 || low > high {
            return Err(DetectError::InvalidThresholds { low, high });
        }
        if !(blur_sigma.is_finite() && blur_sigma > 0.0) {
            return Err(DetectError::invalid_config("edges.blur_sigma", blur_sigma));
        }

        let shape = &self.shape;
        if !(shape.approx_epsilon_ratio > 0.0 && shape.approx_epsilon_ratio < 1.0) {
            return Err(DetectError::invalid_config(
                "shape.approx_epsilon_ratio",
                shape.approx_epsilon_ratio,
            ));
        }
        if !(shape.side_tolerance.is_finite() && shape.side_tolerance >= 0.0) {
            return Err(DetectError::invalid_config(
                "shape.side_tolerance",
                shape.side_tolerance,
            ));
        }
        if !(shape.circularity_min >= 0.0
            && shape.circularity_min < shape.circularity_max
            && shape.circularity_max.is_finite())
        {
            return Err(DetectError::invalid_config(
                "shape.circularity_min",
                format!("{} (max {})", shape.circularity_min, shape.circularity_max),
            ));
        }

        if !(self.overlap.nest_area_ratio > 1.0 && self.overlap.nest_area_ratio.is_finite()) {
            return Err(DetectError::invalid_config(
                "overlap.nest_area_ratio",
                self.overlap.nest_area_ratio,
            ));
        }

        if self.render.label_scale == 0 {
            return Err(DetectError::invalid_config("render.label_scale", 0));
        }

        Ok(())
    }
}
