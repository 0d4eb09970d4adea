// ============================================================
// Layer 1 — CLI Arguments
// ============================================================
// One flat set of flags shared by every phase; `--phase`
// picks what to do with them.
//
// clap's derive macros generate --help, error messages for bad
// values and the string → number conversions.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::Args;
use std::path::PathBuf;

use crate::application::{
    predict_use_case::PredictConfig,
    samples::DataSource,
    train_use_case::TrainConfig,
};
use crate::domain::rotation::RotationPolicy;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Input batch size for training
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Input batch size for validation
    #[arg(long, default_value_t = 64)]
    pub test_batch_size: usize,

    /// Number of epochs to train
    #[arg(long, default_value_t = 50)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 0.001)]
    pub lr: f64,

    /// SGD momentum (accepted, unused by Adam)
    #[arg(long, default_value_t = 0.5)]
    pub momentum: f64,

    /// Disable GPU training
    #[arg(long)]
    pub no_gpu: bool,

    /// Random seed for shuffling and splitting
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// How many batches to wait before logging training status
    #[arg(long, default_value_t = 20)]
    pub log_interval: usize,

    /// Don't write a checkpoint after each epoch
    #[arg(long)]
    pub no_save_model: bool,

    /// Directory for checkpoints, the epoch log and train_config.json
    #[arg(long, default_value = "trained_models")]
    pub save_directory: String,

    /// train, test, finetune or predict
    #[arg(long, default_value = "train")]
    pub phase: String,

    /// Epoch log file name inside the save directory
    #[arg(long, default_value = "log.txt")]
    pub save_log: String,

    /// Training augmentation: none, flip or allangle
    #[arg(long, default_value = "none")]
    pub rotation_type: String,

    /// Build the network without batch normalisation
    #[arg(long)]
    pub no_bn: bool,

    /// Directory holding train.txt / test.txt and the images
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Train on N generated samples instead of label files
    #[arg(long, value_name = "N")]
    pub synthetic: Option<usize>,

    /// Checkpoint to load for predict (prompted for when absent)
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,

    /// Where predict writes its annotated frames
    #[arg(long, default_value = "predictions")]
    pub predict_dir: PathBuf,
}

impl RunArgs {
    pub fn data_source(&self) -> DataSource {
        match self.synthetic {
            Some(train_len) => DataSource::Synthetic { train_len },
            None => DataSource::Labels { dir: self.data_dir.clone() },
        }
    }

    pub fn rotation(&self) -> RotationPolicy {
        RotationPolicy::from_name(&self.rotation_type)
    }
}

/// The boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<&RunArgs> for TrainConfig {
    fn from(a: &RunArgs) -> Self {
        TrainConfig {
            data:            a.data_source(),
            save_directory:  a.save_directory.clone(),
            save_log:        a.save_log.clone(),
            batch_size:      a.batch_size,
            test_batch_size: a.test_batch_size,
            epochs:          a.epochs,
            lr:              a.lr,
            momentum:        a.momentum,
            use_gpu:         !a.no_gpu,
            seed:            a.seed,
            log_interval:    a.log_interval,
            save_model:      !a.no_save_model,
            rotation:        a.rotation(),
            batch_norm:      !a.no_bn,
        }
    }
}

impl From<&RunArgs> for PredictConfig {
    fn from(a: &RunArgs) -> Self {
        PredictConfig {
            checkpoint: a.checkpoint.clone(),
            output_dir: a.predict_dir.clone(),
            use_gpu:    !a.no_gpu,
        }
    }
}
