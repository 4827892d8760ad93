//! Training configuration

use crate::error::ValidationError;
use crate::optim::NonFinitePolicy;
use serde::{Deserialize, Serialize};

/// Hyperparameters and loop settings for one training run
///
/// # Example
///
/// ```
/// use impulso::train::TrainConfig;
///
/// let config = TrainConfig::new()
///     .with_epochs(10)
///     .with_batch_size(100)
///     .with_learning_rate(1e-4)
///     .with_momentum(0.99);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Number of passes over the training set
    pub epochs: usize,
    /// Rows per minibatch
    pub batch_size: usize,
    /// Step size `eta`
    pub learning_rate: f32,
    /// Momentum coefficient `mu`
    pub momentum: f32,
    /// L2 coefficient `lambda`
    pub l2: f32,
    /// Evaluate on the holdout set every N batches
    pub print_period: usize,
    /// Skip the final short batch of each epoch
    pub drop_incomplete_batch: bool,
    /// Handling of NaN/inf gradients
    pub on_non_finite: NonFinitePolicy,
    /// Seed for shuffling and initialization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 5,
            batch_size: 500,
            learning_rate: 1e-3,
            momentum: 0.9,
            l2: 0.0,
            print_period: 10,
            drop_incomplete_batch: true,
            on_non_finite: NonFinitePolicy::Ignore,
            seed: None,
        }
    }
}

impl TrainConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_momentum(mut self, momentum: f32) -> Self {
        self.momentum = momentum;
        self
    }

    pub fn with_l2(mut self, l2: f32) -> Self {
        self.l2 = l2;
        self
    }

    pub fn with_print_period(mut self, print_period: usize) -> Self {
        self.print_period = print_period;
        self
    }

    pub fn with_drop_incomplete_batch(mut self, drop: bool) -> Self {
        self.drop_incomplete_batch = drop;
        self
    }

    pub fn with_non_finite_policy(mut self, policy: NonFinitePolicy) -> Self {
        self.on_non_finite = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.epochs == 0 {
            return Err(ValidationError::InvalidEpochs(self.epochs));
        }
        if self.batch_size == 0 {
            return Err(ValidationError::InvalidBatchSize(self.batch_size));
        }
        if self.print_period == 0 {
            return Err(ValidationError::InvalidPrintPeriod(self.print_period));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ValidationError::InvalidLearningRate(self.learning_rate));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(ValidationError::InvalidMomentum(self.momentum));
        }
        if !self.l2.is_finite() || self.l2 < 0.0 {
            return Err(ValidationError::InvalidL2(self.l2));
        }
        Ok(())
    }
}
