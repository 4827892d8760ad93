//! Core Trainer struct and basic methods

use crate::error::Result;
use crate::model::ForwardModel;
use crate::optim::{Optimizer, SGD};
use crate::params::{check_aligned, ParameterSet};
use crate::train::callback::{
    CallbackContext, CallbackManager, CancellationToken, TrainerCallback,
};
use crate::train::{EvalRecord, MetricsHistory, TrainConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::debug;

/// Owns the model, its parameters and the optimizer state for one run
///
/// Nothing outside the trainer mutates the parameters or the momentum
/// accumulators while it is alive; [`history`](Self::history) and
/// [`params`](Self::params) hand out shared references only.
pub struct Trainer {
    pub(crate) model: Box<dyn ForwardModel>,
    pub(crate) params: ParameterSet,
    pub(crate) optimizer: Box<dyn Optimizer>,
    pub(crate) config: TrainConfig,
    pub(crate) history: MetricsHistory,
    pub(crate) callbacks: CallbackManager,
    pub(crate) cancel: CancellationToken,
    pub(crate) rng: StdRng,
    pub(crate) global_step: usize,
    pub(crate) best_loss: Option<f32>,
    pub(crate) start_time: Option<Instant>,
}

impl Trainer {
    /// Validate `config`, initialize parameters and build momentum SGD
    ///
    /// With `config.seed` set, initialization and every shuffle are
    /// reproducible.
    pub fn new(model: Box<dyn ForwardModel>, config: TrainConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = seeded_rng(config.seed);
        let params = model.init_params(&mut rng)?;
        let optimizer = SGD::new(config.learning_rate, config.momentum)
            .with_non_finite_policy(config.on_non_finite);
        debug!(
            model = model.name(),
            parameters = params.num_elements(),
            "initialized parameters"
        );
        Ok(Self::assemble(model, params, Box::new(optimizer), config, rng))
    }

    /// Start from existing parameters and a caller-supplied optimizer
    ///
    /// `params` must match the names and shapes the model initializes.
    pub fn with_parts(
        model: Box<dyn ForwardModel>,
        params: ParameterSet,
        optimizer: Box<dyn Optimizer>,
        config: TrainConfig,
    ) -> Result<Self> {
        config.validate()?;
        let mut rng = seeded_rng(config.seed);
        let template = model.init_params(&mut rng)?;
        check_aligned(&template, &params)?;
        Ok(Self::assemble(model, params, optimizer, config, rng))
    }

    fn assemble(
        model: Box<dyn ForwardModel>,
        params: ParameterSet,
        optimizer: Box<dyn Optimizer>,
        config: TrainConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            model,
            params,
            optimizer,
            config,
            history: MetricsHistory::new(),
            callbacks: CallbackManager::new(),
            cancel: CancellationToken::new(),
            rng,
            global_step: 0,
            best_loss: None,
            start_time: None,
        }
    }

    /// Add a callback to the trainer
    pub fn add_callback<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.add(callback);
    }

    /// Handle that stops training before the next batch when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn model(&self) -> &dyn ForwardModel {
        self.model.as_ref()
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Evaluation records so far
    pub fn history(&self) -> &MetricsHistory {
        &self.history
    }

    /// Optimizer steps taken so far
    pub fn global_step(&self) -> usize {
        self.global_step
    }

    /// Get current learning rate
    pub fn lr(&self) -> f32 {
        self.optimizer.lr()
    }

    /// Get reference to callback manager
    pub fn callbacks(&self) -> &CallbackManager {
        &self.callbacks
    }

    /// Consume the trainer, keeping the trained parameters and the history
    pub fn into_parts(self) -> (ParameterSet, MetricsHistory) {
        (self.params, self.history)
    }

    pub(crate) fn record_evaluation(&mut self, record: EvalRecord) {
        if record.loss.is_finite() {
            self.best_loss = Some(self.best_loss.map_or(record.loss, |b| b.min(record.loss)));
        }
        self.history.push(record);
    }

    /// Build callback context from current state
    pub(crate) fn build_context(
        &self,
        epoch: usize,
        batch: usize,
        batches_per_epoch: usize,
        loss: f32,
        eval: Option<EvalRecord>,
    ) -> CallbackContext {
        CallbackContext {
            epoch,
            max_epochs: self.config.epochs,
            batch,
            batches_per_epoch,
            global_step: self.global_step,
            loss,
            lr: self.lr(),
            best_loss: self.best_loss,
            eval: eval.or_else(|| self.history.last().copied()),
            elapsed_secs: self.start_time.map_or(0.0, |t| t.elapsed().as_secs_f64()),
        }
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
