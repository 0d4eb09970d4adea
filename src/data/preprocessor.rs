// ============================================================
// Layer 4 — Image Preprocessor
// ============================================================
// Turns a decoded image into the network's input buffer and
// back into something a person can look at.
//
// Forward steps (applied in order):
//   1. Convert to 8-bit grayscale
//   2. Resize to crop_size x crop_size (bilinear)
//   3. Standardise: (p - mean) / (std + 1e-7) over the image
//
// Display goes the other way with a min-max stretch to 0..255,
// since the per-image mean and std are not kept.
//
// Reference: image crate documentation (imageops)

use image::{
    imageops::{self, FilterType},
    DynamicImage, GrayImage, Luma,
};

const STD_EPSILON: f32 = 1e-7;

pub struct Preprocessor {
    crop_size: u32,
}

impl Preprocessor {
    pub fn new(crop_size: usize) -> Self {
        Self { crop_size: crop_size as u32 }
    }

    pub fn crop_size(&self) -> usize {
        self.crop_size as usize
    }

    /// Grayscale, resize and standardise one image.
    /// Returns a row-major buffer of crop_size² values.
    pub fn prepare(&self, img: &DynamicImage) -> Vec<f32> {
        let gray    = img.to_luma8();
        let resized = imageops::resize(&gray, self.crop_size, self.crop_size, FilterType::Triangle);
        let raw: Vec<f32> = resized.as_raw().iter().map(|&p| p as f32).collect();
        standardize(&raw)
    }
}

/// Zero-mean, unit-variance copy of `pixels` (population variance).
pub fn standardize(pixels: &[f32]) -> Vec<f32> {
    if pixels.is_empty() {
        return Vec::new();
    }
    let n    = pixels.len() as f32;
    let mean = pixels.iter().sum::<f32>() / n;
    let var  = pixels.iter().map(|p| (p - mean).powi(2)).sum::<f32>() / n;
    let std  = var.sqrt() + STD_EPSILON;
    pixels.iter().map(|p| (p - mean) / std).collect()
}

/// Stretch a standardised buffer back to a viewable 8-bit image.
/// A constant buffer renders black.
pub fn to_display(pixels: &[f32], width: usize, height: usize) -> GrayImage {
    let min   = pixels.iter().copied().fold(f32::INFINITY, f32::min);
    let max   = pixels.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = max - min;

    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let p = pixels[y as usize * width + x as usize];
        let v = if range > 0.0 { (p - min) / range * 255.0 } else { 0.0 };
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}
