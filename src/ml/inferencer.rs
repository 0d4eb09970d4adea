// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Restores a detector from a checkpoint and predicts landmarks
// for one face crop at a time.

use anyhow::{anyhow, Result};
use burn::{data::dataloader::batcher::Batcher, prelude::*};
use std::path::Path;

use crate::data::batcher::{LandmarkBatch, LandmarkBatcher};
use crate::domain::sample::LandmarkSample;
use crate::infra::checkpoint::load_checkpoint;
use crate::ml::model::{Detector, Mode};

pub struct Inferencer<B: Backend> {
    model:  Detector<B>,
    device: B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn from_checkpoint(path: &Path, device: B::Device) -> Result<Self> {
        let mut model = load_checkpoint::<B>(path, &device)?;
        model.set_mode(Mode::Eval);
        model.set_running_stats(false);

        tracing::info!(
            "Model loaded from '{}' (batch_norm={})",
            path.display(),
            model.batch_norm(),
        );
        Ok(Self::new(model, device))
    }

    pub fn new(model: Detector<B>, device: B::Device) -> Self {
        Self { model, device }
    }

    pub fn batch_norm(&self) -> bool {
        self.model.batch_norm()
    }

    /// Returns the 42 normalised landmark values for `sample`.
    pub fn predict(&self, sample: &LandmarkSample) -> Result<Vec<f32>> {
        let batch: LandmarkBatch<B> = LandmarkBatcher::new().batch(vec![sample.clone()], &self.device);
        self.model
            .forward(batch.images)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read prediction: {e:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::landmarks::LANDMARK_VALUES;
    use crate::domain::sample::CROP_SIZE;
    use crate::infra::checkpoint::CheckpointManager;
    use crate::ml::model::DetectorConfig;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    #[test]
    fn test_predict_from_checkpoint() {
        let tmp    = tempfile::tempdir().unwrap();
        let device = NdArrayDevice::default();
        let ckpt   = CheckpointManager::new(tmp.path()).unwrap();
        let path   = ckpt
            .save_model(&DetectorConfig::new().init::<NdArray>(&device), 0)
            .unwrap();

        let inferencer = Inferencer::<NdArray>::from_checkpoint(&path, device).unwrap();
        assert!(inferencer.batch_norm());

        let sample = LandmarkSample::new(
            vec![0.0; CROP_SIZE * CROP_SIZE],
            CROP_SIZE,
            CROP_SIZE,
            vec![0.5; LANDMARK_VALUES],
        );
        let first  = inferencer.predict(&sample).unwrap();
        let second = inferencer.predict(&sample).unwrap();
        assert_eq!(first.len(), LANDMARK_VALUES);
        // eval mode with frozen stats is deterministic
        assert_eq!(first, second);
    }
}
