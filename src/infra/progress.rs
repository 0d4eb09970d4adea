// ============================================================
// Layer 6 — Console Progress
// ============================================================
// Prints the training transcript to stdout:
//
//   Train Epoch: 0 [0/800 (0%)]	 pts_loss: 0.083214
//   Train Epoch: 0 [1280/800 ...
//   Valid: pts_loss: 0.041532
//   ====================================================
//
// Tracing carries diagnostics; these lines are the user-facing
// transcript and always go to stdout.

use crate::domain::progress::{EpochSummary, TrainProgress};
use crate::domain::traits::TrainingObserver;

pub const SEPARATOR: &str = "====================================================";

#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ConsoleProgress {
    pub fn new() -> Self {
        Self
    }
}

impl TrainingObserver for ConsoleProgress {
    fn on_train_batch(&mut self, progress: &TrainProgress) {
        println!("{}", format_train_line(progress));
    }

    fn on_valid_batch(&mut self, _epoch: usize, running_loss: f64) {
        println!("{}", format_valid_line(running_loss));
    }

    fn on_epoch_end(&mut self, _summary: &EpochSummary) {
        println!("{SEPARATOR}");
    }
}

pub fn format_train_line(p: &TrainProgress) -> String {
    format!(
        "Train Epoch: {} [{}/{} ({:.0}%)]\t pts_loss: {:.6}",
        p.epoch, p.seen, p.total, p.percent, p.loss,
    )
}

pub fn format_valid_line(running_loss: f64) -> String {
    format!("Valid: pts_loss: {running_loss:.6}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_line_format() {
        let p = TrainProgress { epoch: 2, seen: 128, total: 800, percent: 16.0, loss: 0.0123456789 };
        assert_eq!(format_train_line(&p), "Train Epoch: 2 [128/800 (16%)]\t pts_loss: 0.012346");
    }

    #[test]
    fn test_valid_line_format() {
        assert_eq!(format_valid_line(0.5), "Valid: pts_loss: 0.500000");
    }
}
