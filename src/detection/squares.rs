//! Polygon approximation and square classification.
//!
//! A contour becomes a [`SquareCandidate`] when its simplified polygon has
//! four vertices, is convex, has sides within `side_tolerance` of the
//! shortest one, and a circularity strictly inside the configured band.

use imageproc::geometry::{approximate_polygon_dp, arc_length, contour_area};
use imageproc::point::Point;
use std::fmt;

use crate::config::ShapeCriteria;
use crate::models::{Contour, SquareCandidate};

/// Why a polygon was not accepted as a square
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Contour too short to simplify
    Degenerate,
    VertexCount(usize),
    NotConvex,
    UnequalSides { shortest: f64, longest: f64 },
    Circularity(f64),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Degenerate => write!(f, "degenerate contour"),
            Rejection::VertexCount(n) => write!(f, "{} vertices", n),
            Rejection::NotConvex => write!(f, "not convex"),
            Rejection::UnequalSides { shortest, longest } => {
                write!(f, "sides {:.1}..{:.1}", shortest, longest)
            }
            Rejection::Circularity(c) => write!(f, "circularity {:.3}", c),
        }
    }
}

/// Filter contours down to square candidates, keeping detection order
pub fn filter_squares(contours: &[Contour], criteria: &ShapeCriteria) -> Vec<SquareCandidate> {
    contours
        .iter()
        .enumerate()
        .filter_map(|(i, contour)| match classify_contour(contour, criteria) {
            Ok(candidate) => Some(candidate),
            Err(reason) => {
                tracing::trace!("contour {} ({} points) rejected: {}", i, contour.len(), reason);
                None
            }
        })
        .collect()
}

/// Simplify a contour with a perimeter-proportional tolerance and test it
pub fn classify_contour(
    contour: &Contour,
    criteria: &ShapeCriteria,
) -> Result<SquareCandidate, Rejection> {
    let epsilon = criteria.approx_epsilon_ratio * contour.perimeter();
    if contour.len() < 2 || !(epsilon > 0.0) {
        return Err(Rejection::Degenerate);
    }
    let approx = approximate_polygon(&contour.points, epsilon);
    let vertices: Vec<Point<f32>> = approx
        .iter()
        .map(|p| Point::new(p.x as f32, p.y as f32))
        .collect();
    evaluate_polygon(&vertices, criteria)
}

/// Run the square tests on an already simplified polygon
pub fn evaluate_polygon(
    vertices: &[Point<f32>],
    criteria: &ShapeCriteria,
) -> Result<SquareCandidate, Rejection> {
    let quad: [Point<f32>; 4] = vertices
        .try_into()
        .map_err(|_| Rejection::VertexCount(vertices.len()))?;

    if !is_convex(&quad) {
        return Err(Rejection::NotConvex);
    }

    let mut sides = [0.0f64; 4];
    for (i, side) in sides.iter_mut().enumerate() {
        *side = arc_length(&[quad[i], quad[(i + 1) % 4]], false);
    }
    sides.sort_by(f64::total_cmp);
    let (shortest, longest) = (sides[0], sides[3]);
    if !(longest - shortest < criteria.side_tolerance * shortest) {
        return Err(Rejection::UnequalSides { shortest, longest });
    }

    let area = contour_area(&quad);
    let perimeter = arc_length(&quad, true);
    let candidate = SquareCandidate::new(quad, area, perimeter);
    let circularity = candidate.circularity();
    if !(circularity > criteria.circularity_min && circularity < criteria.circularity_max) {
        return Err(Rejection::Circularity(circularity));
    }

    Ok(candidate)
}

/// Accept-or-drop form of [`evaluate_polygon`]
pub fn classify_polygon(vertices: &[Point<f32>], criteria: &ShapeCriteria) -> Option<SquareCandidate> {
    evaluate_polygon(vertices, criteria).ok()
}

/// Douglas-Peucker simplification of a closed curve.
///
/// The curve is cut at two mutually distant points and each half is
/// simplified as an open chain, so the result does not depend on where
/// tracing started. Vertices keep the traversal order of the input.
/// A non-positive `epsilon` leaves the curve unchanged.
pub fn approximate_polygon(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 || !(epsilon > 0.0) {
        return points.to_vec();
    }

    let a = farthest_from(points, 0);
    let b = farthest_from(points, a);
    if a == b {
        return vec![points[a]];
    }

    // Two open chains a -> b and b -> a, walking forward around the curve
    let chain = |from: usize, to: usize| -> Vec<Point<i32>> {
        let len = (to + n - from) % n + 1;
        (0..len).map(|k| points[(from + k) % n]).collect()
    };

    let mut result = approximate_polygon_dp(&chain(a, b), epsilon, false);
    result.pop();
    let mut second = approximate_polygon_dp(&chain(b, a), epsilon, false);
    second.pop();
    result.append(&mut second);
    result
}

fn farthest_from(points: &[Point<i32>], origin: usize) -> usize {
    let o = points[origin];
    let mut best = origin;
    let mut best_d = 0i64;
    for (i, p) in points.iter().enumerate() {
        let dx = (p.x - o.x) as i64;
        let dy = (p.y - o.y) as i64;
        let d = dx * dx + dy * dy;
        if d > best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

/// True when every turn of the closed polygon has the same, non-zero direction
pub fn is_convex(polygon: &[Point<f32>]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0f64;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let c = polygon[(i + 2) % n];
        let cross = ((b.x - a.x) as f64) * ((c.y - b.y) as f64)
            - ((b.y - a.y) as f64) * ((c.x - b.x) as f64);
        if cross == 0.0 || (sign != 0.0 && cross.signum() != sign) {
            return false;
        }
        sign = cross.signum();
    }
    true
}
