// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates a training run on already-loaded samples:
//
//   Step 1: Build Burn datasets          (Layer 4 - data)
//   Step 2: Save config next to weights  (Layer 6 - infra)
//   Step 3: Pick the backend             (Layer 5 - ml)
//   Step 4: Run the training loop        (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::application::samples::DataSource;
use crate::data::dataset::LandmarkDataset;
use crate::domain::progress::EpochSummary;
use crate::domain::rotation::RotationPolicy;
use crate::domain::traits::{SampleSplit, TrainingObserver};
use crate::infra::{checkpoint::CheckpointManager, progress::ConsoleProgress};
use crate::ml::backend::{select_device, ComputeDevice, CpuTraining};
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a run. Written to train_config.json in
// the save directory before the first epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data:            DataSource,
    pub save_directory:  String,
    pub save_log:        String,
    pub batch_size:      usize,
    pub test_batch_size: usize,
    pub epochs:          usize,
    pub lr:              f64,
    /// Accepted for compatibility; Adam does not use it
    pub momentum:        f64,
    pub use_gpu:         bool,
    pub seed:            u64,
    pub log_interval:    usize,
    pub save_model:      bool,
    pub rotation:        RotationPolicy,
    pub batch_norm:      bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data:            DataSource::default(),
            save_directory:  "trained_models".to_string(),
            save_log:        "log.txt".to_string(),
            batch_size:      64,
            test_batch_size: 64,
            epochs:          50,
            lr:              0.001,
            momentum:        0.5,
            use_gpu:         true,
            seed:            1,
            log_interval:    20,
            save_model:      true,
            rotation:        RotationPolicy::None,
            batch_norm:      true,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Trains with the console transcript on stdout
    pub fn execute(&self, samples: SampleSplit) -> Result<Vec<EpochSummary>> {
        self.execute_with(samples, &mut ConsoleProgress::new())
    }

    pub fn execute_with(
        &self,
        samples:  SampleSplit,
        observer: &mut dyn TrainingObserver,
    ) -> Result<Vec<EpochSummary>> {
        let cfg = &self.config;

        if samples.train.is_empty() {
            bail!("No training samples to train on");
        }

        // ── Step 1: Build Burn datasets ───────────────────────────────────────
        let train_dataset = LandmarkDataset::new(samples.train);
        let valid_dataset = LandmarkDataset::new(samples.test);

        // ── Step 2: Save config for later inspection ──────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.save_directory)?;
        ckpt_manager.save_config(cfg)?;

        tracing::info!(
            "Training for {} epochs, batch_size={}, lr={}",
            cfg.epochs, cfg.batch_size, cfg.lr,
        );
        tracing::debug!("momentum={} is ignored by Adam", cfg.momentum);

        // ── Step 3 + 4: Backend and training loop ─────────────────────────────
        let history = match select_device(cfg.use_gpu) {
            ComputeDevice::Cpu => {
                let outcome = run_training::<CpuTraining>(
                    cfg, train_dataset, valid_dataset, &ckpt_manager, &Default::default(), observer,
                )?;
                report(outcome.best_valid_loss(), outcome.model.batch_norm());
                outcome.history
            }
            #[cfg(feature = "wgpu")]
            ComputeDevice::Gpu => {
                let outcome = run_training::<crate::ml::backend::GpuTraining>(
                    cfg, train_dataset, valid_dataset, &ckpt_manager, &Default::default(), observer,
                )?;
                report(outcome.best_valid_loss(), outcome.model.batch_norm());
                outcome.history
            }
        };

        Ok(history)
    }
}

fn report(best_valid_loss: Option<f64>, batch_norm: bool) {
    match best_valid_loss {
        Some(loss) => tracing::info!("Best valid_loss {:.6} (batch_norm={})", loss, batch_norm),
        None       => tracing::warn!("No validation samples, valid_loss was never measured"),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::samples::load_samples;
    use crate::infra::checkpoint::CONFIG_FILE;

    #[test]
    fn test_defaults_match_command_line_defaults() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.batch_size, 64);
        assert_eq!(cfg.epochs, 50);
        assert_eq!(cfg.log_interval, 20);
        assert!(cfg.save_model);
        assert!(cfg.batch_norm);
    }

    #[test]
    fn test_empty_training_set_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            save_directory: tmp.path().to_string_lossy().into_owned(),
            ..TrainConfig::default()
        };
        assert!(TrainUseCase::new(cfg).execute(SampleSplit::default()).is_err());
    }

    #[test]
    fn test_execute_writes_config_and_log() {
        let tmp  = tempfile::tempdir().unwrap();
        let data = DataSource::Synthetic { train_len: 4 };
        let cfg  = TrainConfig {
            data:           data.clone(),
            save_directory: tmp.path().to_string_lossy().into_owned(),
            batch_size:     2,
            epochs:         1,
            use_gpu:        false,
            save_model:     false,
            ..TrainConfig::default()
        };
        let samples = load_samples(&data, RotationPolicy::None, cfg.seed).unwrap();

        let history = TrainUseCase::new(cfg).execute(samples).unwrap();
        assert_eq!(history.len(), 1);
        assert!(tmp.path().join(CONFIG_FILE).exists());
        assert!(tmp.path().join("log.txt").exists());
    }
}
