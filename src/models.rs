use image::DynamicImage;
use imageproc::geometry::arc_length;
use imageproc::point::Point;
use serde::Serialize;

/// A traced, closed boundary from the edge map.
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Length of the closed curve through all points
    pub fn perimeter(&self) -> f64 {
        arc_length(&self.points, true)
    }
}

/// A convex quadrilateral that passed every square test.
///
/// Only built by [`crate::detection::squares::classify_polygon`], so a value
/// of this type always has four vertices, is convex, has near-equal sides
/// and a circularity inside the configured band.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareCandidate {
    vertices: [Point<f32>; 4],
    area: f64,
    perimeter: f64,
    circularity: f64,
}

impl SquareCandidate {
    pub(crate) fn new(vertices: [Point<f32>; 4], area: f64, perimeter: f64) -> Self {
        let circularity = 4.0 * std::f64::consts::PI * area / (perimeter * perimeter);
        Self {
            vertices,
            area,
            perimeter,
            circularity,
        }
    }

    pub fn vertices(&self) -> &[Point<f32>; 4] {
        &self.vertices
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    pub fn circularity(&self) -> f64 {
        self.circularity
    }

    /// Distance between the first two vertices
    pub fn side_length(&self) -> f64 {
        let [a, b, _, _] = self.vertices;
        let dx = (b.x - a.x) as f64;
        let dy = (b.y - a.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn mean_side_length(&self) -> f64 {
        self.perimeter / 4.0
    }

    pub fn centroid(&self) -> (f32, f32) {
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        (sx / 4.0, sy / 4.0)
    }

    pub fn vertex_array(&self) -> [[f32; 2]; 4] {
        self.vertices.map(|p| [p.x, p.y])
    }
}

/// Whether a frame produced a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStatus {
    Found,
    NoCandidates,
}

/// Everything one pipeline invocation produces.
#[derive(Debug, Clone)]
pub struct SquareDetection {
    /// Input copy with candidates outlined and the minimum highlighted.
    /// An exact clone of the input when nothing was detected.
    pub annotated: DynamicImage,
    /// Every candidate that passed classification, in detection order
    pub candidates: Vec<SquareCandidate>,
    /// Candidates left after nested detections were suppressed
    pub survivors: Vec<SquareCandidate>,
    /// Smallest surviving candidate
    pub min_square: Option<SquareCandidate>,
}

impl SquareDetection {
    pub fn status(&self) -> DetectionStatus {
        if self.min_square.is_some() {
            DetectionStatus::Found
        } else {
            DetectionStatus::NoCandidates
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_square.is_none()
    }

    pub fn report(&self, source: impl Into<String>) -> SquareReport {
        let min = self.min_square.as_ref();
        SquareReport {
            source: source.into(),
            status: self.status(),
            candidates: self.candidates.len(),
            survivors: self.survivors.len(),
            vertices: min.map(SquareCandidate::vertex_array),
            area: min.map(SquareCandidate::area),
            perimeter: min.map(SquareCandidate::perimeter),
            circularity: min.map(SquareCandidate::circularity),
            side_length: min.map(SquareCandidate::side_length),
        }
    }
}

/// Serializable summary of a [`SquareDetection`].
#[derive(Debug, Clone, Serialize)]
pub struct SquareReport {
    pub source: String,
    pub status: DetectionStatus,
    pub candidates: usize,
    pub survivors: usize,
    pub vertices: Option<[[f32; 2]; 4]>,
    pub area: Option<f64>,
    pub perimeter: Option<f64>,
    pub circularity: Option<f64>,
    pub side_length: Option<f64>,
}
