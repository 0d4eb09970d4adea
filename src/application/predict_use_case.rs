// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Runs a saved detector over the test samples and shows each
// prediction next to its ground truth:
//
//   Step 1: Resolve the checkpoint path (flag or stdin prompt)
//   Step 2: Restore the model in eval mode (Layer 5 - ml)
//   Step 3: Per sample: predict, annotate, show (Layer 6 - infra)

use anyhow::{bail, Context, Result};
use burn::prelude::Backend;
use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use crate::data::preprocessor::to_display;
use crate::domain::sample::LandmarkSample;
use crate::infra::{
    annotate::annotate,
    viewer::{FrameViewer, Viewer, ViewerAction},
};
use crate::ml::backend::{select_device, ComputeDevice, CpuBackend};
use crate::ml::inferencer::Inferencer;

#[derive(Debug, Clone)]
pub struct PredictConfig {
    /// Prompted for on stdin when absent
    pub checkpoint: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub use_gpu:    bool,
}

pub struct PredictUseCase {
    config: PredictConfig,
}

impl PredictUseCase {
    pub fn new(config: PredictConfig) -> Self {
        Self { config }
    }

    /// Returns how many samples were shown before the run ended
    pub fn execute(&self, samples: &[LandmarkSample]) -> Result<usize> {
        let checkpoint = match &self.config.checkpoint {
            Some(path) => path.clone(),
            None => prompt_checkpoint(&mut io::stdin().lock())?,
        };

        match select_device(self.config.use_gpu) {
            ComputeDevice::Cpu => self.run::<CpuBackend>(&checkpoint, samples, Default::default()),
            #[cfg(feature = "wgpu")]
            ComputeDevice::Gpu => {
                self.run::<crate::ml::backend::GpuBackend>(&checkpoint, samples, Default::default())
            }
        }
    }

    fn run<B: Backend>(&self, checkpoint: &Path, samples: &[LandmarkSample], device: B::Device) -> Result<usize> {
        let inferencer = Inferencer::<B>::from_checkpoint(checkpoint, device)?;
        println!("batch norm: {}", inferencer.batch_norm());

        let mut viewer = FrameViewer::stdin(&self.config.output_dir)?;
        predict_all(&inferencer, samples, &mut viewer)
    }
}

/// Shows every sample until the viewer asks to stop.
pub fn predict_all<B: Backend>(
    inferencer: &Inferencer<B>,
    samples:    &[LandmarkSample],
    viewer:     &mut dyn Viewer,
) -> Result<usize> {
    for (index, sample) in samples.iter().enumerate() {
        let predicted = inferencer.predict(sample)?;
        let gray      = to_display(&sample.image, sample.width, sample.height);
        let frame     = annotate(&gray, &sample.landmarks, &predicted);

        if viewer.show(index, &frame)? == ViewerAction::Quit {
            tracing::info!("Prediction stopped after {} samples", index + 1);
            return Ok(index + 1);
        }
    }
    Ok(samples.len())
}

fn prompt_checkpoint(input: &mut impl BufRead) -> Result<PathBuf> {
    print!("enter model name: ");
    io::stdout().flush().context("Cannot write prompt")?;

    let mut line = String::new();
    input.read_line(&mut line).context("Cannot read model name from stdin")?;
    let name = line.trim();
    if name.is_empty() {
        bail!("No checkpoint given. Pass --checkpoint or type a model path at the prompt.");
    }
    Ok(PathBuf::from(name))
}
