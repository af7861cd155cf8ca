use image::{DynamicImage, GenericImageView, GrayImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;

use crate::error::{DetectError, Result};

/// Reject images with no pixels before any work is done
pub fn ensure_image(img: &DynamicImage) -> Result<()> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(DetectError::NoImage { width, height });
    }
    Ok(())
}

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Apply Gaussian blur to reduce noise
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(img, sigma)
}

/// Detect edges using Canny edge detector.
///
/// Pixels above `high_threshold` seed edges; connected pixels above
/// `low_threshold` extend them. Edge pixels are 255, the rest 0.
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> Result<GrayImage> {
    if !low_threshold.is_finite()
        || !high_threshold.is_finite()
        || low_threshold < 0.0
        || low_threshold > high_threshold
    {
        return Err(DetectError::InvalidThresholds {
            low: low_threshold,
            high: high_threshold,
        });
    }
    Ok(canny(img, low_threshold, high_threshold))
}
