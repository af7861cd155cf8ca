//! Suppression of nested detections.
//!
//! Concentric outlines produce one detection per edge ring. A candidate is
//! dropped when all four of its vertices lie on or inside a candidate whose
//! area exceeds `nest_area_ratio` times its own; the ratio keeps two
//! similar-sized neighbours from suppressing each other.

use imageproc::point::Point;

use crate::models::SquareCandidate;

/// Where a point lies relative to a closed polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonSide {
    Inside,
    OnEdge,
    Outside,
}

impl PolygonSide {
    /// Boundary-inclusive containment
    pub fn is_contained(self) -> bool {
        !matches!(self, PolygonSide::Outside)
    }
}

const EDGE_EPS: f64 = 1e-6;

/// Classify `point` against `polygon` (even-odd rule, edges checked first)
pub fn point_polygon_test(polygon: &[Point<f32>], point: Point<f32>) -> PolygonSide {
    let n = polygon.len();
    if n == 0 {
        return PolygonSide::Outside;
    }
    let (px, py) = (point.x as f64, point.y as f64);
    let mut inside = false;

    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let (ax, ay) = (a.x as f64, a.y as f64);
        let (bx, by) = (b.x as f64, b.y as f64);

        let cross = (bx - ax) * (py - ay) - (by - ay) * (px - ax);
        let within_x = px >= ax.min(bx) - EDGE_EPS && px <= ax.max(bx) + EDGE_EPS;
        let within_y = py >= ay.min(by) - EDGE_EPS && py <= ay.max(by) + EDGE_EPS;
        if cross.abs() <= EDGE_EPS && within_x && within_y {
            return PolygonSide::OnEdge;
        }

        if (ay > py) != (by > py) {
            let x_at = ax + (py - ay) * (bx - ax) / (by - ay);
            if px < x_at {
                inside = !inside;
            }
        }
    }

    if inside {
        PolygonSide::Inside
    } else {
        PolygonSide::Outside
    }
}

/// True when `inner` is nested in `outer` under the given area ratio
pub fn is_nested_in(inner: &SquareCandidate, outer: &SquareCandidate, nest_area_ratio: f64) -> bool {
    outer.area() > nest_area_ratio * inner.area()
        && inner
            .vertices()
            .iter()
            .all(|&v| point_polygon_test(outer.vertices(), v).is_contained())
}

/// Indices of candidates that are not nested in any other, ascending
pub fn surviving_indices(candidates: &[SquareCandidate], nest_area_ratio: f64) -> Vec<usize> {
    (0..candidates.len())
        .filter(|&i| {
            !(0..candidates.len())
                .any(|j| j != i && is_nested_in(&candidates[i], &candidates[j], nest_area_ratio))
        })
        .collect()
}

/// Drop every candidate nested inside a substantially larger one.
/// Survivors keep their detection order.
pub fn resolve_overlaps(candidates: &[SquareCandidate], nest_area_ratio: f64) -> Vec<SquareCandidate> {
    let survivors: Vec<SquareCandidate> = surviving_indices(candidates, nest_area_ratio)
        .into_iter()
        .map(|i| candidates[i].clone())
        .collect();

    if survivors.len() < candidates.len() {
        tracing::debug!(
            "suppressed {} nested candidate(s), {} remain",
            candidates.len() - survivors.len(),
            survivors.len()
        );
    }
    survivors
}
