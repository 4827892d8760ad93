//! Read-only holdout evaluation

use super::core::Trainer;
use crate::error::Result;
use crate::train::metrics::error_rate;
use ndarray::ArrayView2;

/// Loss and error rate of the current parameters on some data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Summed cross-entropy plus the L2 penalty
    pub loss: f32,
    /// Fraction of rows whose argmax prediction misses the label
    pub error_rate: f32,
}

impl Trainer {
    /// Score `inputs` against one-hot `targets`
    ///
    /// Uses the same loss as training. Takes `&self`: no parameter or
    /// momentum state changes.
    pub fn evaluate(
        &self,
        inputs: ArrayView2<'_, f32>,
        targets: ArrayView2<'_, f32>,
    ) -> Result<Score> {
        let eval = self.model.evaluate(inputs, targets, &self.params)?;
        Ok(Score {
            loss: eval.loss + self.params.l2_penalty(self.config.l2),
            error_rate: error_rate(eval.probs.view(), targets),
        })
    }
}
