// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses the flags with
// clap, loads the samples and hands off to Layer 2.
//
// Phases (`--phase`, case-insensitive):
//   train    — train the detector, checkpoint every epoch
//   predict  — run a checkpoint over the test samples
//   test     — placeholder, prints its banner
//   finetune — placeholder, prints its banner
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{bail, Result};
use clap::Parser;
use std::str::FromStr;

use commands::RunArgs;
use crate::application::{
    predict_use_case::PredictUseCase,
    samples::load_samples,
    train_use_case::TrainUseCase,
};

#[derive(Parser, Debug)]
#[command(
    name = "landmark-detector",
    version = "0.1.0",
    about = "Train a CNN that locates 21 facial landmarks, then visualise its predictions."
)]
pub struct Cli {
    #[command(flatten)]
    pub args: RunArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Train,
    Test,
    Finetune,
    Predict,
}

impl FromStr for Phase {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "train"    => Ok(Phase::Train),
            "test"     => Ok(Phase::Test),
            "finetune" => Ok(Phase::Finetune),
            "predict"  => Ok(Phase::Predict),
            _ => bail!("Unknown phase '{s}'. Expected one of: train, test, finetune, predict"),
        }
    }
}

impl Phase {
    /// Printed just before the phase starts
    pub fn banner(self) -> &'static str {
        match self {
            Phase::Train    => "===> Start Training",
            Phase::Test     => "===> Test",
            Phase::Finetune => "===> Finetune",
            Phase::Predict  => "===> Predict",
        }
    }
}

impl Cli {
    /// Loads samples, then routes to the phase's use case.
    pub fn run(self) -> Result<()> {
        let args  = self.args;
        let phase = Phase::from_str(&args.phase)?;

        println!("===> Loading Datasets");
        let samples = load_samples(&args.data_source(), args.rotation(), args.seed)?;

        println!("===> Building Model");
        println!("{}", phase.banner());
        match phase {
            Phase::Train => {
                let history = TrainUseCase::new((&args).into()).execute(samples)?;
                tracing::info!("Finished {} epochs", history.len());
            }
            Phase::Test | Phase::Finetune => {}
            Phase::Predict => {
                let shown = PredictUseCase::new((&args).into()).execute(&samples.test)?;
                tracing::info!("Showed {} predictions", shown);
            }
        }
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{predict_use_case::PredictConfig, samples::DataSource, train_use_case::TrainConfig};
    use crate::domain::rotation::RotationPolicy;

    #[test]
    fn test_phase_is_case_insensitive() {
        assert_eq!("TRAIN".parse::<Phase>().unwrap(), Phase::Train);
        assert_eq!("Predict".parse::<Phase>().unwrap(), Phase::Predict);
        assert_eq!("finetune".parse::<Phase>().unwrap(), Phase::Finetune);
        assert_eq!("test".parse::<Phase>().unwrap(), Phase::Test);
    }

    #[test]
    fn test_every_phase_has_a_banner() {
        assert_eq!(Phase::Train.banner(), "===> Start Training");
        assert_eq!(Phase::Predict.banner(), "===> Predict");
        assert_eq!(Phase::Test.banner(), "===> Test");
        assert_eq!(Phase::Finetune.banner(), "===> Finetune");
    }

    #[test]
    fn test_unknown_phase_names_the_choices() {
        let err = "deploy".parse::<Phase>().unwrap_err().to_string();
        assert!(err.contains("deploy"));
        assert!(err.contains("train, test, finetune, predict"));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["landmark-detector"]).unwrap();
        let cfg = TrainConfig::from(&cli.args);
        assert_eq!(cfg.batch_size, 64);
        assert_eq!(cfg.test_batch_size, 64);
        assert_eq!(cfg.epochs, 50);
        assert_eq!(cfg.lr, 0.001);
        assert_eq!(cfg.seed, 1);
        assert_eq!(cfg.save_directory, "trained_models");
        assert_eq!(cfg.save_log, "log.txt");
        assert!(cfg.use_gpu && cfg.save_model && cfg.batch_norm);
        assert_eq!(cfg.rotation, RotationPolicy::None);
        assert_eq!(cfg.data, DataSource::Labels { dir: "data".into() });
        assert_eq!(cli.args.phase, "train");
    }

    #[test]
    fn test_flags_reach_the_configs() {
        let cli = Cli::try_parse_from([
            "landmark-detector",
            "--no-gpu", "--no-bn", "--no-save-model",
            "--synthetic", "40",
            "--rotation-type", "AllAngle",
            "--phase", "predict",
            "--checkpoint", "trained_models/detector_epoch_3.mpk",
        ])
        .unwrap();

        let train = TrainConfig::from(&cli.args);
        assert!(!train.use_gpu && !train.batch_norm && !train.save_model);
        assert_eq!(train.data, DataSource::Synthetic { train_len: 40 });
        assert_eq!(train.rotation, RotationPolicy::AllAngle);

        let predict = PredictConfig::from(&cli.args);
        assert_eq!(predict.checkpoint.unwrap().to_string_lossy(), "trained_models/detector_epoch_3.mpk");
        assert_eq!(predict.output_dir.to_string_lossy(), "predictions");
    }

    #[test]
    fn test_placeholder_phase_runs() {
        let cli = Cli::try_parse_from(["landmark-detector", "--synthetic", "4", "--phase", "Test"]).unwrap();
        assert!(cli.run().is_ok());
    }
}
