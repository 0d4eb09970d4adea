// ============================================================
// Layer 4 — Landmark Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec<LandmarkSample>
// into two tensors:
//
//   images:    [N, 1, H, W]   (one grayscale channel)
//   landmarks: [N, 42]
//
// Every sample in a dataset shares the same crop size, so the
// pixel buffers are simply concatenated and reshaped.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::domain::landmarks::LANDMARK_VALUES;
use crate::domain::sample::LandmarkSample;

/// A batch ready for the forward pass.
#[derive(Debug, Clone)]
pub struct LandmarkBatch<B: Backend> {
    /// Shape: [batch_size, 1, height, width]
    pub images: Tensor<B, 4>,

    /// Shape: [batch_size, 42]
    pub landmarks: Tensor<B, 2>,
}

impl<B: Backend> LandmarkBatch<B> {
    pub fn len(&self) -> usize {
        self.images.dims()[0]
    }
}

#[derive(Clone, Debug, Default)]
pub struct LandmarkBatcher;

impl LandmarkBatcher {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Batcher<B, LandmarkSample, LandmarkBatch<B>> for LandmarkBatcher {
    fn batch(&self, items: Vec<LandmarkSample>, device: &B::Device) -> LandmarkBatch<B> {
        let batch_size      = items.len();
        let (height, width) = (items[0].height, items[0].width);

        let pixels: Vec<f32> = items
            .iter()
            .flat_map(|s| s.image.iter().copied())
            .collect();

        let targets: Vec<f32> = items
            .iter()
            .flat_map(|s| s.landmarks.iter().copied())
            .collect();

        let images = Tensor::<B, 4>::from_data(
            TensorData::new(pixels, [batch_size, 1, height, width]),
            device,
        );
        let landmarks = Tensor::<B, 2>::from_data(
            TensorData::new(targets, [batch_size, LANDMARK_VALUES]),
            device,
        );

        LandmarkBatch { images, landmarks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    #[test]
    fn test_batch_shapes_and_order() {
        let device = NdArrayDevice::default();
        let make = |v: f32| LandmarkSample::new(vec![v; 6], 3, 2, vec![v; LANDMARK_VALUES]);
        let batch: LandmarkBatch<NdArray> =
            LandmarkBatcher::new().batch(vec![make(1.0), make(2.0)], &device);

        assert_eq!(batch.images.dims(), [2, 1, 2, 3]);
        assert_eq!(batch.landmarks.dims(), [2, LANDMARK_VALUES]);
        assert_eq!(batch.len(), 2);

        let px = batch.images.into_data().to_vec::<f32>().unwrap();
        assert_eq!(px[0], 1.0);
        assert_eq!(px[6], 2.0);
    }
}
