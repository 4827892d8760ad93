//! Append-only record of holdout evaluations

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One holdout evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalRecord {
    /// Epoch index (0-based)
    pub iteration: usize,
    /// Batch index within the epoch
    pub batch: usize,
    /// Total holdout loss including the L2 term
    pub loss: f32,
    /// Fraction of misclassified holdout samples
    pub error_rate: f32,
}

/// Ordered evaluation log
///
/// Records are only ever appended; the trainer is the single writer and
/// hands out shared references or clones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsHistory {
    records: Vec<EvalRecord>,
}

impl MetricsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: EvalRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in order
    pub fn records(&self) -> &[EvalRecord] {
        &self.records
    }

    /// Most recent record
    pub fn last(&self) -> Option<&EvalRecord> {
        self.records.last()
    }

    /// Loss values in order
    pub fn losses(&self) -> Vec<f32> {
        self.records.iter().map(|r| r.loss).collect()
    }

    /// Lowest finite loss seen
    pub fn best_loss(&self) -> Option<f32> {
        self.records
            .iter()
            .map(|r| r.loss)
            .filter(|l| l.is_finite())
            .fold(None, |best, l| Some(best.map_or(l, |b: f32| b.min(l))))
    }

    /// Trailing moving average of the loss over `window` records
    ///
    /// Entry `i` averages records `[i + 1 - window, i]`; the first
    /// `window - 1` records produce no entry.
    pub fn trailing_mean(&self, window: usize) -> Vec<f32> {
        if window == 0 {
            return Vec::new();
        }
        self.records
            .windows(window)
            .map(|w| w.iter().map(|r| r.loss).sum::<f32>() / window as f32)
            .collect()
    }

    /// Write `iteration,batch,loss,error_rate` rows with a header
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let csv_err = |source| Error::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
        for record in &self.records {
            writer.serialize(record).map_err(csv_err)?;
        }
        writer
            .flush()
            .map_err(|e| Error::io(format!("flushing {}", path.display()), e))
    }
}
