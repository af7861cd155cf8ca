//! End-to-end tests running the detector on synthetic frames.

mod common;

use image::DynamicImage;
use minsquare::{detect_min_square, DetectError, SquareDetector};

use common::*;

fn default_detector() -> anyhow::Result<SquareDetector> {
    Ok(SquareDetector::new(DetectorConfig::default())?)
}

#[test]
fn test_concentric_squares_keep_outer_only() -> anyhow::Result<()> {
    let img = concentric_squares_image();
    let detection = default_detector()?.detect(&img)?;

    assert_eq!(detection.status(), DetectionStatus::Found);
    assert_eq!(
        detection.survivors.len(),
        1,
        "Expected only the outer square, got: {:?}",
        detection.survivors
    );

    let min = detection.min_square.as_ref().expect("outer square");
    let (cx, cy) = min.centroid();
    assert!((cx - 200.0).abs() < 3.0 && (cy - 200.0).abs() < 3.0, "centroid ({}, {})", cx, cy);
    assert!(
        min.area() > 0.85 * 40_000.0 && min.area() < 1.15 * 40_000.0,
        "area {}",
        min.area()
    );

    Ok(())
}

#[test]
fn test_concentric_outlines_keep_outer_only() -> anyhow::Result<()> {
    let img = concentric_outlines_image();
    let detection = default_detector()?.detect(&img)?;

    assert_eq!(
        detection.survivors.len(),
        1,
        "Expected only the outer outline, got: {:?}",
        detection.survivors
    );

    let min = detection.min_square.as_ref().expect("outer outline");
    let (cx, cy) = min.centroid();
    assert!((cx - 200.0).abs() < 3.0 && (cy - 200.0).abs() < 3.0, "centroid ({}, {})", cx, cy);
    assert!(
        min.area() > 0.85 * 40_000.0 && min.area() < 1.15 * 40_000.0,
        "area {}",
        min.area()
    );

    Ok(())
}

#[test]
fn test_smallest_of_separate_squares_is_selected() -> anyhow::Result<()> {
    let img = two_squares_image();
    let detection = default_detector()?.detect(&img)?;

    assert_eq!(detection.candidates.len(), 2);
    assert_eq!(detection.survivors.len(), 2);

    let min = detection.min_square.as_ref().expect("smallest square");
    assert!(
        min.area() > 0.8 * 3_600.0 && min.area() < 1.2 * 3_600.0,
        "area {}",
        min.area()
    );
    let (cx, cy) = min.centroid();
    assert!((cx - 290.0).abs() < 3.0 && (cy - 150.0).abs() < 3.0, "centroid ({}, {})", cx, cy);
    assert!((min.side_length() - 60.0).abs() < 6.0);

    Ok(())
}

#[test]
fn test_no_quadrilaterals_gives_empty_result() -> anyhow::Result<()> {
    let mut canvas = blank_canvas(300, 300);
    fill_right_triangle(&mut canvas, 50, 50, 150, BLACK);
    let img = DynamicImage::ImageRgb8(canvas);

    let detection = default_detector()?.detect(&img)?;

    assert_eq!(detection.status(), DetectionStatus::NoCandidates);
    assert!(detection.is_empty());
    assert!(detection.candidates.is_empty());
    assert_eq!(detection.annotated.as_bytes(), img.as_bytes());
    assert_eq!(detection.annotated.color(), img.color());

    Ok(())
}

#[test]
fn test_rectangle_is_not_a_square() -> anyhow::Result<()> {
    let mut canvas = blank_canvas(400, 300);
    fill_rect(&mut canvas, 50, 100, 240, 120, BLACK);
    let img = DynamicImage::ImageRgb8(canvas);

    let detection = default_detector()?.detect(&img)?;

    assert_eq!(detection.status(), DetectionStatus::NoCandidates);
    Ok(())
}

#[test]
fn test_blank_frame_is_returned_unmodified() -> anyhow::Result<()> {
    let img = DynamicImage::ImageRgb8(blank_canvas(64, 48));
    let detection = detect_min_square(&img, 50.0, 150.0)?;

    assert!(detection.min_square.is_none());
    assert_eq!(detection.annotated.as_bytes(), img.as_bytes());
    Ok(())
}

#[test]
fn test_empty_image_is_rejected() {
    let img = DynamicImage::new_rgb8(0, 0);
    let result = detect_min_square(&img, 50.0, 150.0);

    assert!(
        matches!(result, Err(DetectError::NoImage { width: 0, height: 0 })),
        "Expected NoImage, got: {:?}",
        result.map(|d| d.status())
    );
}

#[test]
fn test_inverted_thresholds_are_rejected() {
    let img = two_squares_image();
    let result = detect_min_square(&img, 150.0, 50.0);

    assert!(matches!(result, Err(DetectError::InvalidThresholds { .. })));
}

#[test]
fn test_detection_is_repeatable() -> anyhow::Result<()> {
    let img = two_squares_image();
    let detector = default_detector()?;

    let first = detector.detect(&img)?;
    let second = detector.detect(&img)?;

    let a = first.min_square.expect("square");
    let b = second.min_square.expect("square");
    let bits = |c: &SquareCandidate| c.vertex_array().map(|[x, y]| [x.to_bits(), y.to_bits()]);
    assert_eq!(bits(&a), bits(&b));
    assert_eq!(a.area().to_bits(), b.area().to_bits());
    assert_eq!(first.annotated.as_bytes(), second.annotated.as_bytes());

    Ok(())
}

#[test]
fn test_annotation_marks_minimum_in_its_color() -> anyhow::Result<()> {
    let img = two_squares_image();
    let config = DetectorConfig::default();
    let red = config.render.minimum_color;
    let green = config.render.candidate_color;

    let detection = SquareDetector::new(config)?.detect(&img)?;
    let annotated = detection.annotated.to_rgb8();

    let count = |color: [u8; 3]| annotated.pixels().filter(|p| p.0 == color).count();
    assert!(count(red) > 0, "minimum outline missing");
    assert!(count(green) > 0, "candidate outline missing");
    Ok(())
}

#[test]
fn test_debug_accessors_match_detection() -> anyhow::Result<()> {
    let img = two_squares_image();
    let detector = default_detector()?;

    let contours = detector.get_contours(&img)?;
    let candidates = detector.get_candidates(&img)?;

    assert!(contours.len() >= 2);
    assert_eq!(candidates.len(), 2);
    Ok(())
}
