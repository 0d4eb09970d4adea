// ============================================================
// Layer 3 — Training Progress Records
// ============================================================
// Values the training loop hands to its observer. They carry
// numbers only; formatting lives in infra::progress so tests
// can count and inspect them without parsing stdout.

use serde::{Deserialize, Serialize};

/// Emitted every `log_interval` training batches
#[derive(Debug, Clone, PartialEq)]
pub struct TrainProgress {
    /// Epoch index (starts at 0)
    pub epoch: usize,

    /// Samples processed before this batch: batch_idx * batch_size
    pub seen: usize,

    /// Size of the training set
    pub total: usize,

    /// 100 * batch_idx / number_of_batches
    pub percent: f64,

    /// Mean loss of this batch
    pub loss: f64,
}

/// One finished epoch — the line written to the log file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochSummary {
    pub epoch: usize,

    /// Sample-weighted mean training loss over the epoch
    pub train_loss: f64,

    /// Sample-weighted mean validation loss over the epoch
    pub valid_loss: f64,
}

impl EpochSummary {
    pub fn new(epoch: usize, train_loss: f64, valid_loss: f64) -> Self {
        Self { epoch, train_loss, valid_loss }
    }

    /// Returns true if this epoch improved over the previous best valid_loss
    pub fn is_improvement(&self, best_valid_loss: f64) -> bool {
        self.valid_loss < best_valid_loss
    }
}

/// Running sum of per-sample loss.
///
/// Each batch contributes `batch_loss * batch_len`, so the mean is
/// exact even when the last batch is short.
#[derive(Debug, Clone, Copy, Default)]
pub struct LossAccumulator {
    sum:   f64,
    count: usize,
}

impl LossAccumulator {
    pub fn add(&mut self, batch_loss: f64, batch_len: usize) {
        self.sum   += batch_loss * batch_len as f64;
        self.count += batch_len;
    }

    #[cfg(test)]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean per-sample loss, NaN before any sample was added
    pub fn mean(&self) -> f64 {
        if self.count > 0 { self.sum / self.count as f64 } else { f64::NAN }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement() {
        let s = EpochSummary::new(2, 0.05, 0.03);
        assert!(s.is_improvement(0.04));
        assert!(!s.is_improvement(0.02));
        assert!(s.is_improvement(f64::INFINITY));
    }

    #[test]
    fn test_accumulator_weights_by_batch_size() {
        let mut acc = LossAccumulator::default();
        acc.add(1.0, 2);
        acc.add(4.0, 1);
        // (1*2 + 4*1) / 3
        assert!((acc.mean() - 2.0).abs() < 1e-12);
        assert_eq!(acc.count(), 3);
    }

    #[test]
    fn test_empty_accumulator_is_nan() {
        assert!(LossAccumulator::default().mean().is_nan());
    }
}
