// ============================================================
// Layer 2 — Sample Loading
// ============================================================
// Picks the SampleSource for a run and loads the train/test
// split. Every phase loads its samples before dispatch.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{loader::LabelFileSource, synthetic::SyntheticSource};
use crate::domain::rotation::RotationPolicy;
use crate::domain::sample::CROP_SIZE;
use crate::domain::traits::{SampleSource, SampleSplit};

/// Where the samples come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// `train.txt` (and optionally `test.txt`) under a directory
    Labels { dir: PathBuf },

    /// Generated faces; the test split is a quarter of the training size
    Synthetic { train_len: usize },
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Labels { dir: PathBuf::from("data") }
    }
}

impl DataSource {
    pub fn source(&self, seed: u64) -> Box<dyn SampleSource> {
        match self {
            DataSource::Labels { dir } => Box::new(LabelFileSource::new(dir.clone(), CROP_SIZE, seed)),
            DataSource::Synthetic { train_len } => Box::new(SyntheticSource::new(
                *train_len,
                synthetic_test_len(*train_len),
                CROP_SIZE,
                seed,
            )),
        }
    }
}

pub fn synthetic_test_len(train_len: usize) -> usize {
    (train_len / 4).max(1)
}

pub fn load_samples(data: &DataSource, rotation: RotationPolicy, seed: u64) -> Result<SampleSplit> {
    let split = data.source(seed).load_split(rotation)?;
    tracing::info!(
        "Samples: {} train ({} augmentation), {} test",
        split.train.len(),
        rotation,
        split.test.len(),
    );
    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_split_sizes() {
        let split = load_samples(&DataSource::Synthetic { train_len: 8 }, RotationPolicy::Flip, 1).unwrap();
        assert_eq!(split.train.len(), 16);
        assert_eq!(split.test.len(), 2);
    }

    #[test]
    fn test_missing_label_dir_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let data = DataSource::Labels { dir: tmp.path().to_path_buf() };
        assert!(load_samples(&data, RotationPolicy::None, 1).is_err());
    }

    #[test]
    fn test_synthetic_test_len_is_never_zero() {
        assert_eq!(synthetic_test_len(1), 1);
        assert_eq!(synthetic_test_len(100), 25);
    }
}
