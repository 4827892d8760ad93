//! Stop training when the holdout loss plateaus

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};
use tracing::info;

/// Stops after `patience` holdout evaluations without improvement
///
/// An evaluation counts as an improvement when its loss is below the best
/// seen so far by more than `min_delta`. Non-finite losses never improve.
///
/// # Example
///
/// ```
/// use impulso::train::callback::EarlyStopping;
///
/// // Stop after 5 evaluations without at least 0.001 improvement
/// let early_stop = EarlyStopping::new(5, 0.001);
/// assert_eq!(early_stop.patience(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct EarlyStopping {
    patience: usize,
    min_delta: f32,
    best_loss: f32,
    pub(crate) evals_without_improvement: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize, min_delta: f32) -> Self {
        Self {
            patience,
            min_delta,
            best_loss: f32::INFINITY,
            evals_without_improvement: 0,
        }
    }

    pub fn patience(&self) -> usize {
        self.patience
    }

    /// Best holdout loss observed
    pub fn best_loss(&self) -> f32 {
        self.best_loss
    }

    /// Reset internal state
    pub fn reset(&mut self) {
        self.best_loss = f32::INFINITY;
        self.evals_without_improvement = 0;
    }

    fn check_improvement(&mut self, loss: f32) -> bool {
        if loss.is_finite() && loss < self.best_loss - self.min_delta {
            self.best_loss = loss;
            self.evals_without_improvement = 0;
            true
        } else {
            self.evals_without_improvement += 1;
            false
        }
    }
}

impl TrainerCallback for EarlyStopping {
    fn on_train_begin(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        self.reset();
        CallbackAction::Continue
    }

    fn on_evaluation(&mut self, ctx: &CallbackContext) -> CallbackAction {
        let Some(record) = ctx.eval else {
            return CallbackAction::Continue;
        };
        self.check_improvement(record.loss);

        if self.evals_without_improvement >= self.patience {
            info!(
                patience = self.patience,
                best_loss = self.best_loss,
                "early stopping: no holdout improvement"
            );
            CallbackAction::Stop
        } else {
            CallbackAction::Continue
        }
    }

    fn name(&self) -> &'static str {
        "EarlyStopping"
    }
}
