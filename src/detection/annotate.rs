//! Drawing detections onto a copy of the input frame.

use image::{DynamicImage, GrayImage, Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut, Canvas};
use imageproc::point::Point;
use imageproc::rect::Rect;

use crate::config::RenderConfig;
use crate::models::{Contour, SquareCandidate};

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

/// 8-bit colour canvases annotations are drawn on
pub trait Paint: Canvas {
    fn paint(rgb: [u8; 3]) -> Self::Pixel;
}

impl Paint for RgbImage {
    fn paint(rgb: [u8; 3]) -> Rgb<u8> {
        Rgb(rgb)
    }
}

impl Paint for RgbaImage {
    fn paint([r, g, b]: [u8; 3]) -> Rgba<u8> {
        Rgba([r, g, b, u8::MAX])
    }
}

/// Annotated copy of `img`: every candidate outlined, the minimum highlighted
/// and labelled. Returns an untouched clone when there is nothing to draw.
///
/// Drawing happens on an 8-bit RGBA copy when the input has an alpha
/// channel and on an 8-bit RGB copy otherwise, so grayscale and 16-bit
/// frames come back as 8-bit colour once something is drawn.
pub fn render(
    img: &DynamicImage,
    candidates: &[SquareCandidate],
    minimum: Option<&SquareCandidate>,
    style: &RenderConfig,
) -> DynamicImage {
    if candidates.is_empty() && minimum.is_none() {
        return img.clone();
    }

    if img.color().has_alpha() {
        let mut canvas = img.to_rgba8();
        draw_detections(&mut canvas, candidates, minimum, style);
        DynamicImage::ImageRgba8(canvas)
    } else {
        let mut canvas = img.to_rgb8();
        draw_detections(&mut canvas, candidates, minimum, style);
        DynamicImage::ImageRgb8(canvas)
    }
}

fn draw_detections<C: Paint>(
    canvas: &mut C,
    candidates: &[SquareCandidate],
    minimum: Option<&SquareCandidate>,
    style: &RenderConfig,
) {
    draw_candidates(canvas, candidates, style);
    if let Some(min) = minimum {
        draw_minimum(canvas, min, style);
    }
}

pub fn draw_candidates<C: Paint>(canvas: &mut C, candidates: &[SquareCandidate], style: &RenderConfig) {
    let color = C::paint(style.candidate_color);
    for candidate in candidates {
        draw_polygon(canvas, candidate.vertices(), color, style.candidate_thickness);
    }
}

pub fn draw_minimum<C: Paint>(canvas: &mut C, minimum: &SquareCandidate, style: &RenderConfig) {
    let color = C::paint(style.minimum_color);
    draw_polygon(canvas, minimum.vertices(), color, style.minimum_thickness);

    let size = label_size(&style.label, style.label_scale);
    let origin = label_origin(minimum, size, style.label_offset);
    draw_label(canvas, &style.label, origin, color, style.label_scale);
}

/// Top-left corner of a `size` label next to the first vertex of `square`.
///
/// The label sits `offset` pixels beyond the vertex on each axis, on the side
/// facing away from the centroid, so the whole box lies outside the outline.
pub fn label_origin(square: &SquareCandidate, size: (u32, u32), offset: i32) -> (i32, i32) {
    let first = square.vertices()[0];
    let (cx, cy) = square.centroid();
    let (x, y) = (first.x.round() as i32, first.y.round() as i32);
    let (w, h) = (size.0 as i32, size.1 as i32);

    let left = if first.x > cx { x + offset } else { x - offset - w };
    let top = if first.y > cy { y + offset } else { y - offset - h };
    (left, top)
}

/// Width and height in pixels of `text` drawn at `scale`
pub fn label_size(text: &str, scale: u32) -> (u32, u32) {
    let scale = scale.max(1);
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return (0, 0);
    }
    (chars * (GLYPH_WIDTH + 1) * scale - scale, GLYPH_HEIGHT * scale)
}

/// Closed outline, `thickness` pixels wide
pub fn draw_polygon<C: Canvas>(canvas: &mut C, polygon: &[Point<f32>], color: C::Pixel, thickness: u32) {
    let n = polygon.len();
    if n < 2 {
        return;
    }
    let t = thickness.max(1) as i32;
    let offsets = -((t - 1) / 2)..=(t / 2);

    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        for dx in offsets.clone() {
            for dy in offsets.clone() {
                let (dx, dy) = (dx as f32, dy as f32);
                draw_line_segment_mut(canvas, (a.x + dx, a.y + dy), (b.x + dx, b.y + dy), color);
            }
        }
    }
}

/// Text with its top-left corner at `origin`, shifted to stay inside the canvas
pub fn draw_label<C: Canvas>(canvas: &mut C, text: &str, origin: (i32, i32), color: C::Pixel, scale: u32) {
    let scale = scale.max(1);
    let (text_w, text_h) = label_size(text, scale);
    if text_w == 0 {
        return;
    }
    let advance = (GLYPH_WIDTH + 1) * scale;

    let (width, height) = canvas.dimensions();
    let max_x = (width as i32 - text_w as i32).max(0);
    let max_y = (height as i32 - text_h as i32).max(0);
    let left = origin.0.clamp(0, max_x);
    let top = origin.1.clamp(0, max_y);

    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = glyph(ch) else {
            continue;
        };
        let cell_x = left + (i as u32 * advance) as i32;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    let x = cell_x + (col * scale) as i32;
                    let y = top + (row as u32 * scale) as i32;
                    draw_filled_rect_mut(canvas, Rect::at(x, y).of_size(scale, scale), color);
                }
            }
        }
    }
}

/// Edge map with the given contours traced over it, for stage dumps
pub fn render_contours(edges: &GrayImage, contours: &[Contour]) -> RgbImage {
    let mut canvas = DynamicImage::ImageLuma8(edges.clone()).to_rgb8();
    let color = Rgb([255, 64, 0]);
    for contour in contours {
        for p in &contour.points {
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < canvas.width() && (p.y as u32) < canvas.height() {
                canvas.put_pixel(p.x as u32, p.y as u32, color);
            }
        }
    }
    canvas
}

/// 5x7 bitmap rows, most significant of the low five bits is the left column
fn glyph(ch: char) -> Option<[u8; 7]> {
    let rows = match ch.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        _ => return None,
    };
    Some(rows)
}
