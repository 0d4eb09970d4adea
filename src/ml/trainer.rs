// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Train + validation loop using Burn's DataLoader and Adam.
//
// Per epoch:
//   1. normalisation layers → train mode, running stats armed
//   2. shuffled batches: forward, MSE, backward, Adam step
//   3. normalisation layers → eval mode, running stats frozen
//   4. model.valid() (inner backend, no autograd) over the
//      validation set
//   5. checkpoint (optional) + one line in the epoch log
//
// Burn builds a fresh gradient set on every backward pass, so
// there is no zero_grad step.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::{
        dataloader::{DataLoader, DataLoaderBuilder},
        dataset::Dataset,
    },
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::sync::Arc;

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{LandmarkBatch, LandmarkBatcher},
    dataset::LandmarkDataset,
};
use crate::domain::progress::{EpochSummary, LossAccumulator, TrainProgress};
use crate::domain::traits::TrainingObserver;
use crate::infra::{checkpoint::CheckpointManager, epoch_log::EpochLog};
use crate::ml::model::{Detector, DetectorConfig, Mode};

pub struct TrainingOutcome<B: AutodiffBackend> {
    pub model:   Detector<B>,
    pub history: Vec<EpochSummary>,
}

impl<B: AutodiffBackend> TrainingOutcome<B> {
    pub fn best_valid_loss(&self) -> Option<f64> {
        self.history
            .iter()
            .map(|s| s.valid_loss)
            .filter(|l| !l.is_nan())
            .reduce(f64::min)
    }
}

pub fn run_training<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    train_dataset: LandmarkDataset,
    valid_dataset: LandmarkDataset,
    ckpt_manager:  &CheckpointManager,
    device:        &B::Device,
    observer:      &mut dyn TrainingObserver,
) -> Result<TrainingOutcome<B>> {
    let batch_size      = cfg.batch_size.max(1);
    let test_batch_size = cfg.test_batch_size.max(1);
    let log_interval    = cfg.log_interval.max(1);

    let train_len   = train_dataset.len();
    let num_batches = train_len.div_ceil(batch_size);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: Detector<B> = DetectorConfig::new()
        .with_batch_norm(cfg.batch_norm)
        .init(device);
    tracing::info!("Model ready: batch_norm={}", cfg.batch_norm);

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // momentum is an SGD setting; Adam keeps its own β1/β2
    let mut optim = AdamConfig::new().init();

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_loader: Arc<dyn DataLoader<B, LandmarkBatch<B>>> =
        DataLoaderBuilder::new(LandmarkBatcher::new())
            .batch_size(batch_size)
            .shuffle(cfg.seed)
            .num_workers(1)
            .build(train_dataset);

    let valid_loader: Arc<dyn DataLoader<B::InnerBackend, LandmarkBatch<B::InnerBackend>>> =
        DataLoaderBuilder::new(LandmarkBatcher::new())
            .batch_size(test_batch_size)
            .num_workers(1)
            .build(valid_dataset);

    // Created (truncated) once; dropping it on any early return closes it
    let mut epoch_log = EpochLog::create(ckpt_manager.dir().join(&cfg.save_log))?;

    let mut history    = Vec::with_capacity(cfg.epochs);
    let mut best_valid = f64::INFINITY;

    for epoch in 0..cfg.epochs {
        // ── Training phase ────────────────────────────────────────────────────
        model.set_mode(Mode::Train);
        model.set_running_stats(true);

        let mut train_loss = LossAccumulator::default();

        for (batch_idx, batch) in train_loader.iter().enumerate() {
            let batch_len = batch.len();
            let (loss, _) = model.forward_loss(batch.images, batch.landmarks);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss.add(loss_val, batch_len);

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(cfg.lr, model, grads);

            if batch_idx % log_interval == 0 {
                observer.on_train_batch(&TrainProgress {
                    epoch,
                    seen:    batch_idx * batch_size,
                    total:   train_len,
                    percent: 100.0 * batch_idx as f64 / num_batches as f64,
                    loss:    loss_val,
                });
            }
        }

        // ── Validation phase ──────────────────────────────────────────────────
        model.set_mode(Mode::Eval);
        model.set_running_stats(false);
        let model_valid = model.valid();

        let mut valid_loss = LossAccumulator::default();

        for batch in valid_loader.iter() {
            let batch_len = batch.len();
            let (loss, _) = model_valid.forward_loss(batch.images, batch.landmarks);
            valid_loss.add(loss.into_scalar().elem::<f64>(), batch_len);
            observer.on_valid_batch(epoch, valid_loss.mean());
        }

        // ── Checkpoint + log ──────────────────────────────────────────────────
        if cfg.save_model {
            let path = ckpt_manager.save_model(&model, epoch)?;
            tracing::info!("Checkpoint saved to '{}'", path.display());
        }

        let summary = EpochSummary::new(epoch, train_loss.mean(), valid_loss.mean());
        epoch_log.append(&summary)?;

        if summary.is_improvement(best_valid) {
            best_valid = summary.valid_loss;
            tracing::info!("Epoch {}: new best valid_loss {:.6}", epoch, best_valid);
        }

        observer.on_epoch_end(&summary);
        history.push(summary);
    }

    epoch_log.close()?;
    tracing::info!("Training complete!");

    Ok(TrainingOutcome { model, history })
}
