//! Progress logging through `tracing`

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};
use tracing::{debug, info};

/// Logs epoch boundaries, holdout evaluations and, every `log_interval`
/// steps, the training batch loss
#[derive(Clone, Debug)]
pub struct ProgressCallback {
    log_interval: usize,
}

impl ProgressCallback {
    /// `log_interval` of 0 disables per-step logging
    pub fn new(log_interval: usize) -> Self {
        Self { log_interval }
    }

    pub fn log_interval(&self) -> usize {
        self.log_interval
    }
}

impl Default for ProgressCallback {
    fn default() -> Self {
        Self { log_interval: 10 }
    }
}

impl TrainerCallback for ProgressCallback {
    fn on_epoch_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        debug!(
            epoch = ctx.epoch + 1,
            max_epochs = ctx.max_epochs,
            lr = ctx.lr,
            "epoch starting"
        );
        CallbackAction::Continue
    }

    fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        info!(
            epoch = ctx.epoch + 1,
            max_epochs = ctx.max_epochs,
            loss = ctx.loss,
            holdout_loss = ctx.eval.map(|r| r.loss),
            elapsed_secs = ctx.elapsed_secs,
            "epoch finished"
        );
        CallbackAction::Continue
    }

    fn on_step_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        if self.log_interval > 0 && ctx.global_step % self.log_interval == 0 {
            debug!(
                step = ctx.global_step,
                batch = ctx.batch,
                batches = ctx.batches_per_epoch,
                loss = ctx.loss,
                "training step"
            );
        }
        CallbackAction::Continue
    }

    fn on_evaluation(&mut self, ctx: &CallbackContext) -> CallbackAction {
        if let Some(record) = ctx.eval {
            info!(
                iteration = record.iteration,
                batch = record.batch,
                loss = record.loss,
                error_rate = record.error_rate,
                "holdout evaluation"
            );
        }
        CallbackAction::Continue
    }

    fn name(&self) -> &'static str {
        "ProgressCallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::train::EvalRecord;

    #[test]
    fn test_progress_callback_always_continues() {
        let mut progress = ProgressCallback::new(5);
        let ctx = CallbackContext {
            max_epochs: 10,
            batch: 5,
            batches_per_epoch: 100,
            global_step: 5,
            loss: 0.5,
            lr: 0.001,
            eval: Some(EvalRecord {
                iteration: 0,
                batch: 5,
                loss: 0.7,
                error_rate: 0.2,
            }),
            ..Default::default()
        };

        assert_eq!(progress.on_epoch_begin(&ctx), CallbackAction::Continue);
        assert_eq!(progress.on_step_end(&ctx), CallbackAction::Continue);
        assert_eq!(progress.on_evaluation(&ctx), CallbackAction::Continue);
        assert_eq!(progress.on_epoch_end(&ctx), CallbackAction::Continue);
    }

    #[test]
    fn test_zero_interval_is_accepted() {
        let mut progress = ProgressCallback::new(0);
        let ctx = CallbackContext::default();
        assert_eq!(progress.on_step_end(&ctx), CallbackAction::Continue);
    }

    #[test]
    fn test_defaults() {
        let pc = ProgressCallback::default();
        assert_eq!(pc.log_interval(), 10);
        assert_eq!(pc.name(), "ProgressCallback");
    }
}
