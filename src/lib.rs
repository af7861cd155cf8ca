pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;

pub use config::{DetectorConfig, EdgeConfig, OverlapConfig, RenderConfig, ShapeCriteria};
pub use detection::{detect_min_square, SquareDetector};
pub use error::{DetectError, Result};
pub use models::{Contour, DetectionStatus, SquareCandidate, SquareDetection, SquareReport};
pub use pipeline::{DebugConfig, Pipeline, PipelineContext};
