use burn::data::dataset::Dataset;

use crate::domain::sample::LandmarkSample;

/// In-memory collection of face crops behind Burn's Dataset trait,
/// so the DataLoader can call .get(index) and .len() on it.
pub struct LandmarkDataset {
    samples: Vec<LandmarkSample>,
}

impl LandmarkDataset {
    pub fn new(samples: Vec<LandmarkSample>) -> Self { Self { samples } }
}

impl Dataset<LandmarkSample> for LandmarkDataset {
    fn get(&self, index: usize) -> Option<LandmarkSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
