// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records one CSV row per epoch so learning curves can be
// plotted after the run.
//
// Output file: <checkpoint_dir>/metrics.csv
//
//   epoch,train_loss,eval_loss,eval_accuracy
//   1,2.413200,2.198700,0.351000
//   2,1.902100,1.887300,0.442000
//   ...
//
// How to read the metrics:
//   - Loss should decrease each epoch (model is learning)
//   - If eval_loss rises while train_loss falls → overfitting
//   - eval_accuracy is next-character accuracy over every
//     position of every held-out window

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

const HEADER: &str = "epoch,train_loss,eval_loss,eval_accuracy";

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Token-weighted cross-entropy over the training split
    pub train_loss: f64,

    /// Token-weighted cross-entropy over the evaluation split
    pub eval_loss: f64,

    /// Fraction of evaluation positions predicted exactly
    pub eval_accuracy: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, eval_loss: f64, eval_accuracy: f64) -> Self {
        Self { epoch, train_loss, eval_loss, eval_accuracy }
    }

    /// Returns true if this epoch improved over the previous best eval_loss
    pub fn is_improvement(&self, best_eval_loss: f64) -> bool {
        self.eval_loss < best_eval_loss
    }
}

/// Appends epoch metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header only if the file doesn't exist yet,
    /// so repeated runs append to one log.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.eval_loss,
            m.eval_accuracy,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, eval_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.eval_loss,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 2.5, 2.3, 0.2);
        assert!(m.is_improvement(3.0));
        assert!(!m.is_improvement(2.0));
    }

    #[test]
    fn test_header_written_once_and_rows_appended() {
        let dir = tempfile::tempdir().unwrap();

        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(1, 2.0, 2.5, 0.25)).unwrap();

        // A second logger on the same directory must not repeat the header.
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(2, 1.5, 2.0, 0.5)).unwrap();

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(
            csv,
            "epoch,train_loss,eval_loss,eval_accuracy\n\
             1,2.000000,2.500000,0.250000\n\
             2,1.500000,2.000000,0.500000\n"
        );
    }
}
