pub mod preprocessing;
pub mod contours;
pub mod squares;
pub mod overlap;
pub mod selection;
pub mod annotate;

use image::{DynamicImage, GrayImage};

use crate::config::DetectorConfig;
use crate::error::Result;
use crate::models::{Contour, SquareCandidate, SquareDetection};

/// Main detection pipeline orchestrator.
///
/// Holds configuration only; every call to [`SquareDetector::detect`] works on
/// its own data, so one detector can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct SquareDetector {
    config: DetectorConfig,
}

/// Intermediate products of one run, kept for stage dumps
pub struct StageOutputs {
    pub gray: GrayImage,
    pub blurred: GrayImage,
    pub edges: GrayImage,
    pub contours: Vec<Contour>,
    pub detection: SquareDetection,
}

impl SquareDetector {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run the full detection pipeline on an image
    pub fn detect(&self, img: &DynamicImage) -> Result<SquareDetection> {
        Ok(self.detect_stages(img)?.detection)
    }

    /// Same as [`detect`](Self::detect), also returning every intermediate image
    pub fn detect_stages(&self, img: &DynamicImage) -> Result<StageOutputs> {
        preprocessing::ensure_image(img)?;
        let edge_cfg = &self.config.edges;

        tracing::debug!("Preprocessing {}x{} image", img.width(), img.height());
        let gray = preprocessing::to_grayscale(img);
        let blurred = preprocessing::apply_blur(&gray, edge_cfg.blur_sigma);

        let edges =
            preprocessing::detect_edges(&blurred, edge_cfg.low_threshold, edge_cfg.high_threshold)?;
        let contours = contours::find_outer_contours(&edges);
        tracing::debug!("Found {} outer contours", contours.len());

        let detection = self.resolve(img, &contours);

        Ok(StageOutputs {
            gray,
            blurred,
            edges,
            contours,
            detection,
        })
    }

    /// Classification, overlap resolution, selection and rendering
    fn resolve(&self, img: &DynamicImage, contours: &[Contour]) -> SquareDetection {
        let candidates = squares::filter_squares(contours, &self.config.shape);
        tracing::debug!(
            "Found {} square candidates (from {} contours)",
            candidates.len(),
            contours.len()
        );

        let survivors = overlap::resolve_overlaps(&candidates, self.config.overlap.nest_area_ratio);
        let min_square = selection::select_minimum(&survivors).cloned();

        match &min_square {
            Some(min) => tracing::info!(
                "Minimum square: area {:.1}, side {:.1}px, {} survivor(s)",
                min.area(),
                min.side_length(),
                survivors.len()
            ),
            None => tracing::info!("No square found"),
        }

        let annotated = annotate::render(img, &candidates, min_square.as_ref(), &self.config.render);

        SquareDetection {
            annotated,
            candidates,
            survivors,
            min_square,
        }
    }

    /// Get all outer contours from an image (for debugging)
    pub fn get_contours(&self, img: &DynamicImage) -> Result<Vec<Contour>> {
        Ok(self.detect_stages(img)?.contours)
    }

    /// Get classified square candidates before overlap resolution (for debugging)
    pub fn get_candidates(&self, img: &DynamicImage) -> Result<Vec<SquareCandidate>> {
        Ok(self.detect(img)?.candidates)
    }
}

/// Detect with the default configuration and the given edge thresholds
pub fn detect_min_square(img: &DynamicImage, low_threshold: f32, high_threshold: f32) -> Result<SquareDetection> {
    let config = DetectorConfig::default().with_thresholds(low_threshold, high_threshold);
    SquareDetector::new(config)?.detect(img)
}
