// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types the
// application layer can swap implementations freely:
//   - LabelFileSource and SyntheticSource implement SampleSource
//   - ConsoleProgress prints, tests collect into a Vec
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::progress::{EpochSummary, TrainProgress};
use crate::domain::rotation::RotationPolicy;
use crate::domain::sample::LandmarkSample;

/// Train and test collections returned by a sample source
#[derive(Debug, Clone, Default)]
pub struct SampleSplit {
    pub train: Vec<LandmarkSample>,
    pub test:  Vec<LandmarkSample>,
}

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Any component that can supply labelled face crops.
///
/// The rotation policy only augments the training collection;
/// the test collection is always returned as loaded.
pub trait SampleSource {
    fn load_split(&self, rotation: RotationPolicy) -> Result<SampleSplit>;
}

// ─── TrainingObserver ─────────────────────────────────────────────────────────
/// Receives the training transcript as it happens.
pub trait TrainingObserver {
    /// Called every `log_interval` training batches
    fn on_train_batch(&mut self, progress: &TrainProgress);

    /// Called after every validation batch with the cumulative mean loss
    fn on_valid_batch(&mut self, epoch: usize, running_loss: f64);

    /// Called once the epoch's checkpoint and log line are written
    fn on_epoch_end(&mut self, summary: &EpochSummary);
}
