use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};

use crate::models::Contour;

/// Find the outer boundaries in a binary edge image.
///
/// Only top-level outer borders are returned: holes, and anything traced
/// inside a hole (such as a smaller shape drawn within a frame), are dropped.
/// Order is the raster order in which borders are first met.
pub fn find_outer_contours(edges: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(edges)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| Contour::new(c.points))
        .collect()
}
