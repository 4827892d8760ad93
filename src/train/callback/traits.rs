//! Core traits and types for the callback system
//!
//! - `CallbackContext` - State passed to callbacks
//! - `CallbackAction` - Actions a callback can request
//! - `TrainerCallback` - The trait all callbacks implement

use crate::train::EvalRecord;

/// Snapshot of training state handed to callbacks
#[derive(Clone, Debug, Default)]
pub struct CallbackContext {
    /// Current epoch (0-indexed)
    pub epoch: usize,
    /// Total epochs planned
    pub max_epochs: usize,
    /// Current batch within the epoch
    pub batch: usize,
    /// Batches per epoch
    pub batches_per_epoch: usize,
    /// Optimizer steps taken so far
    pub global_step: usize,
    /// Most recent training batch loss (including L2)
    pub loss: f32,
    /// Current learning rate
    pub lr: f32,
    /// Lowest holdout loss seen so far
    pub best_loss: Option<f32>,
    /// Holdout evaluation that triggered `on_evaluation`, else the latest one
    pub eval: Option<EvalRecord>,
    /// Wall-clock seconds since training started
    pub elapsed_secs: f64,
}

/// Action to take after a callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    /// Continue training normally
    Continue,
    /// Stop training
    Stop,
    /// Skip the rest of the current epoch
    SkipEpoch,
}

/// Hooks into the training loop
///
/// All methods default to no-ops, so implementors only override the events
/// they care about.
pub trait TrainerCallback: Send {
    /// Called before the first epoch
    fn on_train_begin(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Called once after the loop exits, including early stops
    fn on_train_end(&mut self, _ctx: &CallbackContext) {}

    fn on_epoch_begin(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    fn on_epoch_end(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Called after each optimizer step
    fn on_step_end(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Called after each holdout evaluation; `ctx.eval` holds the new record
    fn on_evaluation(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Callback name for logging
    fn name(&self) -> &'static str {
        "TrainerCallback"
    }
}
