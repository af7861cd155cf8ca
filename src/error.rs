//! Error types for the square detection pipeline

use thiserror::Error;

/// Result type alias for detection operations
pub type Result<T> = std::result::Result<T, DetectError>;

/// Failures that stop a pipeline invocation.
///
/// Finding no square is not one of them: see [`crate::models::DetectionStatus`].
#[derive(Error, Debug)]
pub enum DetectError {
    /// Input image has no pixels
    #[error("No image: input is {width}x{height}")]
    NoImage { width: u32, height: u32 },

    /// Edge thresholds must satisfy 0 <= low <= high
    #[error("Invalid edge thresholds: low = {low}, high = {high}")]
    InvalidThresholds { low: f32, high: f32 },

    /// Any other out-of-range parameter
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidConfig { parameter: String, value: String },

    /// Configuration file could not be read or written
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid JSON for [`crate::config::DetectorConfig`]
    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DetectError {
    pub fn invalid_config(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidConfig {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }
}
