//! Training step operations

use super::core::Trainer;
use crate::data::Batch;
use crate::error::{Error, Result};
use crate::optim::NonFinitePolicy;
use tracing::warn;

/// What one update step did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Summed cross-entropy plus the L2 penalty, before the update
    pub loss: f32,
    /// L2 penalty part of `loss`
    pub penalty: f32,
    /// Rows in the batch
    pub batch_size: usize,
}

impl Trainer {
    /// Forward pass, L2 term and one optimizer update on `batch`
    ///
    /// Every gradient is computed from the current parameters before any of
    /// them changes. On error (shape mismatch, or a non-finite loss or
    /// gradient under the abort policy) parameters and momentum are left as
    /// they were.
    pub fn train_step(&mut self, batch: &Batch) -> Result<StepOutcome> {
        let pass = self
            .model
            .forward(batch.inputs.view(), batch.targets.view(), &self.params)?;

        let lambda = self.config.l2;
        let penalty = self.params.l2_penalty(lambda);
        let mut grads = pass.grads;
        self.params.add_l2_gradient(&mut grads, lambda)?;

        let loss = pass.loss + penalty;
        if !loss.is_finite() {
            match self.config.on_non_finite {
                NonFinitePolicy::Abort => {
                    return Err(Error::NumericInstability {
                        step: self.global_step,
                        parameter: "loss".to_string(),
                    });
                }
                NonFinitePolicy::Warn => {
                    warn!(step = self.global_step, loss, "non-finite training loss");
                }
                NonFinitePolicy::Ignore => {}
            }
        }

        self.optimizer.step(&mut self.params, &grads)?;
        self.global_step += 1;

        Ok(StepOutcome {
            loss,
            penalty,
            batch_size: batch.size(),
        })
    }
}
