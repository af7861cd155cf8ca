use image::{DynamicImage, Rgb, RgbImage};
use imageproc::point::Point;
use minsquare::detection::squares::classify_polygon;
use minsquare::{ShapeCriteria, SquareCandidate};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Creates a white RGB canvas
pub fn blank_canvas(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

/// Fills the axis-aligned square with top-left corner (x, y)
pub fn fill_square(img: &mut RgbImage, x: u32, y: u32, side: u32, color: Rgb<u8>) {
    fill_rect(img, x, y, side, side, color);
}

pub fn fill_rect(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    for py in y..(y + height).min(img.height()) {
        for px in x..(x + width).min(img.width()) {
            img.put_pixel(px, py, color);
        }
    }
}

/// Draws a square outline `width` pixels thick, inside the given bounds
pub fn stroke_square(img: &mut RgbImage, x: u32, y: u32, side: u32, width: u32, color: Rgb<u8>) {
    fill_rect(img, x, y, side, width, color);
    fill_rect(img, x, y + side - width, side, width, color);
    fill_rect(img, x, y, width, side, color);
    fill_rect(img, x + side - width, y, width, side, color);
}

/// Fills the triangle (x0, y0), (x0 + base, y0), (x0, y0 + base)
pub fn fill_right_triangle(img: &mut RgbImage, x0: u32, y0: u32, base: u32, color: Rgb<u8>) {
    for dy in 0..base {
        for dx in 0..(base - dy) {
            img.put_pixel(x0 + dx, y0 + dy, color);
        }
    }
}

/// 400x400 frame: a 200px dark square with an 80px light square in its centre
pub fn concentric_squares_image() -> DynamicImage {
    let mut img = blank_canvas(400, 400);
    fill_square(&mut img, 100, 100, 200, BLACK);
    fill_square(&mut img, 160, 160, 80, WHITE);
    DynamicImage::ImageRgb8(img)
}

/// 400x400 frame: 200px and 80px square outlines sharing the centre (200, 200)
pub fn concentric_outlines_image() -> DynamicImage {
    let mut img = blank_canvas(400, 400);
    stroke_square(&mut img, 100, 100, 200, 4, BLACK);
    stroke_square(&mut img, 160, 160, 80, 4, BLACK);
    DynamicImage::ImageRgb8(img)
}

/// 400x300 frame with two separate squares, sides 120 and 60
pub fn two_squares_image() -> DynamicImage {
    let mut img = blank_canvas(400, 300);
    fill_square(&mut img, 40, 60, 120, BLACK);
    fill_square(&mut img, 260, 120, 60, BLACK);
    DynamicImage::ImageRgb8(img)
}

/// Vertices of an axis-aligned square, clockwise in image coordinates
pub fn axis_square(x: f32, y: f32, side: f32) -> Vec<Point<f32>> {
    vec![
        Point::new(x, y),
        Point::new(x + side, y),
        Point::new(x + side, y + side),
        Point::new(x, y + side),
    ]
}

pub fn polygon(points: &[(f32, f32)]) -> Vec<Point<f32>> {
    points.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

/// Classified candidate for a polygon known to be square-like
pub fn candidate(vertices: &[Point<f32>]) -> SquareCandidate {
    classify_polygon(vertices, &ShapeCriteria::default())
        .expect("fixture polygon should classify as a square")
}

/// Every boundary pixel of an axis-aligned square, traced clockwise from the top-left corner
pub fn traced_square(x: i32, y: i32, side: i32) -> Vec<Point<i32>> {
    let mut points = Vec::new();
    for i in 0..side {
        points.push(Point::new(x + i, y));
    }
    for i in 0..side {
        points.push(Point::new(x + side, y + i));
    }
    for i in 0..side {
        points.push(Point::new(x + side - i, y + side));
    }
    for i in 0..side {
        points.push(Point::new(x, y + side - i));
    }
    points
}
