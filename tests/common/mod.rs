mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from minsquare for tests
pub use minsquare::detection::overlap::{point_polygon_test, resolve_overlaps, PolygonSide};
pub use minsquare::detection::selection::{min_area_index, select_minimum};
pub use minsquare::detection::squares::{classify_polygon, evaluate_polygon, Rejection};
pub use minsquare::{DetectionStatus, DetectorConfig, ShapeCriteria, SquareCandidate};
