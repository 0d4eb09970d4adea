// ============================================================
// Layer 6 — Epoch Log
// ============================================================
// Plain-text training log, one line per finished epoch:
//
//   Epoch: 0 train_loss: 0.041233 valid_loss: 0.038120
//   Epoch: 1 train_loss: 0.022871 valid_loss: 0.021904
//
// The file is truncated when the log is created and stays open
// for the whole run. Dropping the EpochLog closes it, so an
// early return out of the training loop still releases it.

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::domain::progress::EpochSummary;

pub struct EpochLog {
    path:   PathBuf,
    writer: BufWriter<File>,
}

impl EpochLog {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .with_context(|| format!("Cannot create log file '{}'", path.display()))?;

        tracing::debug!("Writing epoch log to '{}'", path.display());
        Ok(Self { path, writer: BufWriter::new(file) })
    }

    /// Appends one line and flushes it, so the file is readable mid-run.
    pub fn append(&mut self, summary: &EpochSummary) -> Result<()> {
        writeln!(self.writer, "{}", format_epoch_line(summary))
            .and_then(|_| self.writer.flush())
            .with_context(|| format!("Cannot write to log file '{}'", self.path.display()))
    }

    pub fn close(mut self) -> Result<()> {
        self.writer
            .flush()
            .with_context(|| format!("Cannot flush log file '{}'", self.path.display()))
    }
}

pub fn format_epoch_line(summary: &EpochSummary) -> String {
    format!(
        "Epoch: {} train_loss: {:.6} valid_loss: {:.6}",
        summary.epoch, summary.train_loss, summary.valid_loss,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_epoch_line() {
        let line = format_epoch_line(&EpochSummary::new(4, 0.5, 0.25));
        assert_eq!(line, "Epoch: 4 train_loss: 0.500000 valid_loss: 0.250000");
    }

    #[test]
    fn test_create_truncates_and_appends() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("log.txt");
        std::fs::write(&path, "stale\n").unwrap();

        let mut log = EpochLog::create(&path).unwrap();
        log.append(&EpochSummary::new(0, 1.0, 2.0)).unwrap();
        log.append(&EpochSummary::new(1, 0.5, 1.5)).unwrap();
        log.close().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Epoch: 0 "));
        assert!(lines[1].starts_with("Epoch: 1 "));
    }

    #[test]
    fn test_nan_mean_is_written_as_nan() {
        let line = format_epoch_line(&EpochSummary::new(0, f64::NAN, 0.1));
        assert!(line.contains("train_loss: NaN"));
    }
}
