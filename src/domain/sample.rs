use serde::{Deserialize, Serialize};

use crate::domain::landmarks::LANDMARK_VALUES;

/// One labelled face crop.
///
/// `image` is a row-major `height x width` grayscale buffer that has
/// already been standardised; `landmarks` holds 42 normalised values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSample {
    pub image:     Vec<f32>,
    pub width:     usize,
    pub height:    usize,
    pub landmarks: Vec<f32>,
}

impl LandmarkSample {
    pub fn new(image: Vec<f32>, width: usize, height: usize, landmarks: Vec<f32>) -> Self {
        debug_assert_eq!(image.len(), width * height);
        debug_assert_eq!(landmarks.len(), LANDMARK_VALUES);
        Self { image, width, height, landmarks }
    }

    pub fn pixel(&self, x: usize, y: usize) -> f32 {
        self.image[y * self.width + x]
    }
}

/// Side length of the square face crops the network consumes.
/// 108 px reduces to the 4 x 4 map the regression head expects.
pub const CROP_SIZE: usize = 108;
