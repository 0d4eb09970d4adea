// ============================================================
// Layer 4 — Synthetic Sample Source
// ============================================================
// Generates labelled "faces" without touching the disk: a dim
// noise background with a bright blob stamped at every landmark.
// The blobs make the task learnable, so a short run shows the
// loss going down. Used by `--synthetic N` and by the tests.

use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::data::{augment, preprocessor::standardize};
use crate::domain::landmarks::{points, LANDMARK_VALUES};
use crate::domain::rotation::RotationPolicy;
use crate::domain::sample::LandmarkSample;
use crate::domain::traits::{SampleSource, SampleSplit};

const BLOB_RADIUS: i64 = 2;

pub struct SyntheticSource {
    train_len: usize,
    test_len:  usize,
    crop_size: usize,
    seed:      u64,
}

impl SyntheticSource {
    pub fn new(train_len: usize, test_len: usize, crop_size: usize, seed: u64) -> Self {
        Self { train_len, test_len, crop_size, seed }
    }
}

impl SampleSource for SyntheticSource {
    fn load_split(&self, rotation: RotationPolicy) -> Result<SampleSplit> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let train: Vec<_> = (0..self.train_len)
            .map(|_| synthetic_sample(&mut rng, self.crop_size))
            .collect();
        let test: Vec<_> = (0..self.test_len)
            .map(|_| synthetic_sample(&mut rng, self.crop_size))
            .collect();
        tracing::info!(
            "Generated {} synthetic training and {} test samples",
            train.len(),
            test.len()
        );
        Ok(SampleSplit { train: augment::apply(train, rotation), test })
    }
}

fn synthetic_sample(rng: &mut StdRng, size: usize) -> LandmarkSample {
    let landmarks: Vec<f32> = (0..LANDMARK_VALUES)
        .map(|_| rng.gen_range(0.15..0.85))
        .collect();

    let mut image: Vec<f32> = (0..size * size).map(|_| rng.gen_range(0.0..0.2)).collect();
    for (x, y) in points(&landmarks) {
        let cx = (x * size as f32) as i64;
        let cy = (y * size as f32) as i64;
        for dy in -BLOB_RADIUS..=BLOB_RADIUS {
            for dx in -BLOB_RADIUS..=BLOB_RADIUS {
                let (px, py) = (cx + dx, cy + dy);
                if px >= 0 && py >= 0 && (px as usize) < size && (py as usize) < size {
                    image[py as usize * size + px as usize] = 1.0;
                }
            }
        }
    }

    LandmarkSample::new(standardize(&image), size, size, landmarks)
}
