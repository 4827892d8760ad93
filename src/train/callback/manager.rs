//! Dispatch of training events to registered callbacks

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};

/// Ordered list of callbacks
///
/// Events go to callbacks in registration order; the first callback that
/// asks to stop (or skip) short-circuits the rest.
#[derive(Default)]
pub struct CallbackManager {
    callbacks: Vec<Box<dyn TrainerCallback>>,
}

impl CallbackManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback
    pub fn add<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.push(Box::new(callback));
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Names of registered callbacks in dispatch order
    pub fn names(&self) -> Vec<&'static str> {
        self.callbacks.iter().map(|cb| cb.name()).collect()
    }

    pub fn on_train_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        self.dispatch(|cb| cb.on_train_begin(ctx))
    }

    pub fn on_train_end(&mut self, ctx: &CallbackContext) {
        for cb in &mut self.callbacks {
            cb.on_train_end(ctx);
        }
    }

    pub fn on_epoch_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        self.dispatch(|cb| cb.on_epoch_begin(ctx))
    }

    pub fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        self.dispatch(|cb| cb.on_epoch_end(ctx))
    }

    pub fn on_step_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        self.dispatch(|cb| cb.on_step_end(ctx))
    }

    pub fn on_evaluation(&mut self, ctx: &CallbackContext) -> CallbackAction {
        self.dispatch(|cb| cb.on_evaluation(ctx))
    }

    fn dispatch<F>(&mut self, mut event: F) -> CallbackAction
    where
        F: FnMut(&mut dyn TrainerCallback) -> CallbackAction,
    {
        for cb in &mut self.callbacks {
            match event(cb.as_mut()) {
                CallbackAction::Continue => {}
                action => return action,
            }
        }
        CallbackAction::Continue
    }
}

impl std::fmt::Debug for CallbackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackManager")
            .field("callbacks", &self.names())
            .finish()
    }
}
