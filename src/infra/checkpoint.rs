// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores detector weights with Burn's
// NamedMpkFileRecorder at full precision, so a reloaded model
// reproduces the saved one's outputs bit for bit.
//
// What gets saved:
//   1. detector_epoch_<n>.mpk  — { model, batch_norm }
//   2. train_config.json       — every hyperparameter of the run
//
// The batch_norm flag travels inside the checkpoint because the
// forward pass depends on it and it is not a parameter.
//
// File layout:
//   trained_models/
//     detector_epoch_0.mpk
//     detector_epoch_1.mpk
//     ...
//     train_config.json
//     log.txt
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Record, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::{Detector, DetectorConfig, DetectorRecord};

pub const CHECKPOINT_PREFIX:    &str = "detector_epoch_";
pub const CHECKPOINT_EXTENSION: &str = "mpk";
pub const CONFIG_FILE:          &str = "train_config.json";

type CheckpointRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

/// What one checkpoint file holds
#[derive(Record)]
pub struct DetectorCheckpoint<B: Backend> {
    pub model:      DetectorRecord<B>,
    pub batch_norm: bool,
}

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Creates the directory (and parents) if missing.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create save directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the checkpoint written for `epoch`
    pub fn checkpoint_path(&self, epoch: usize) -> PathBuf {
        self.dir
            .join(format!("{CHECKPOINT_PREFIX}{epoch}"))
            .with_extension(CHECKPOINT_EXTENSION)
    }

    /// Writes `detector_epoch_<epoch>.mpk` and returns its path.
    pub fn save_model<B: Backend>(&self, model: &Detector<B>, epoch: usize) -> Result<PathBuf> {
        // the recorder appends the extension itself
        let stem = self.dir.join(format!("{CHECKPOINT_PREFIX}{epoch}"));

        let record = DetectorCheckpoint {
            model:      model.clone().into_record(),
            batch_norm: model.batch_norm(),
        };
        CheckpointRecorder::new()
            .record(record, stem.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", stem.display()))?;

        let path = self.checkpoint_path(epoch);
        tracing::debug!("Saved checkpoint '{}'", path.display());
        Ok(path)
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }
}

/// Rebuilds a detector from a checkpoint file.
///
/// Accepts either `detector_epoch_3` or `detector_epoch_3.mpk`.
/// The returned model is in the freshly initialised mode; callers
/// switch it to evaluation themselves.
pub fn load_checkpoint<B: Backend>(path: &Path, device: &B::Device) -> Result<Detector<B>> {
    let stem = checkpoint_stem(path);

    let checkpoint: DetectorCheckpoint<B> = CheckpointRecorder::new()
        .load(stem.clone(), device)
        .with_context(|| {
            format!("Cannot load checkpoint '{}'. Have you trained the model first?", path.display())
        })?;

    let model = DetectorConfig::new()
        .with_batch_norm(checkpoint.batch_norm)
        .init::<B>(device)
        .load_record(checkpoint.model);

    Ok(model)
}

fn checkpoint_stem(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext == CHECKPOINT_EXTENSION => path.with_extension(""),
        _ => path.to_path_buf(),
    }
}
