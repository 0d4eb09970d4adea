// ============================================================
// Layer 6 — Frame Annotation
// ============================================================
// Turns a grayscale crop into an RGB frame with two sets of
// hollow circle markers:
//
//   ground truth → red
//   prediction   → blue (drawn last, so it wins on overlap)
//
// Landmarks are normalised; pixel positions are (x*W, y*H)
// truncated toward zero. Circle pixels that fall outside the
// frame are skipped.

use image::{DynamicImage, GrayImage, Rgb, RgbImage};

use crate::domain::landmarks::to_pixels;

pub const TRUTH_COLOR:     Rgb<u8> = Rgb([255, 0, 0]);
pub const PREDICTED_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const MARKER_RADIUS:   i32     = 3;

pub fn annotate(gray: &GrayImage, truth: &[f32], predicted: &[f32]) -> RgbImage {
    let mut frame = DynamicImage::ImageLuma8(gray.clone()).to_rgb8();
    let (width, height) = frame.dimensions();

    for (x, y) in to_pixels(truth, width, height) {
        draw_circle(&mut frame, x, y, MARKER_RADIUS, TRUTH_COLOR);
    }
    for (x, y) in to_pixels(predicted, width, height) {
        draw_circle(&mut frame, x, y, MARKER_RADIUS, PREDICTED_COLOR);
    }
    frame
}

/// Midpoint circle, outline only
pub fn draw_circle(img: &mut RgbImage, cx: i32, cy: i32, radius: i32, color: Rgb<u8>) {
    let (mut x, mut y, mut err) = (radius, 0, 1 - radius);

    while x >= y {
        for (dx, dy) in [(x, y), (y, x), (-y, x), (-x, y), (-x, -y), (-y, -x), (y, -x), (x, -y)] {
            put_pixel(img, cx + dx, cy + dy, color);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

fn put_pixel(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}
