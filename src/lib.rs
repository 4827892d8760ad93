//! # impulso
//!
//! Minibatch gradient descent with classic momentum and L2 regularization
//! for image classifiers.
//!
//! The crate is split the way a run flows:
//!
//! - [`data`]: CSV loading, normalization, one-hot labels, holdout split,
//!   shuffled minibatches
//! - [`model`]: the [`ForwardModel`](model::ForwardModel) evaluator trait
//!   with softmax regression and one-hidden-layer MLP implementations
//! - [`params`]: named parameter tensors and the L2 term
//! - [`optim`]: the [`Optimizer`](optim::Optimizer) trait and momentum [`SGD`](optim::SGD)
//! - [`train`]: the [`Trainer`](train::Trainer) loop, holdout metrics,
//!   callbacks and cancellation
//! - [`config`]: YAML run configs and CLI argument types
//!
//! # Example
//!
//! ```
//! use impulso::data::{holdout_split, Dataset};
//! use impulso::model::SoftmaxRegression;
//! use impulso::train::{TrainConfig, Trainer};
//! use ndarray::Array2;
//! use rand::SeedableRng;
//!
//! # fn main() -> impulso::Result<()> {
//! let features = Array2::from_shape_fn((40, 2), |(i, j)| {
//!     if (i % 2 == 0) == (j == 0) { 1.0 } else { 0.0 }
//! });
//! let labels = (0..40).map(|i| i % 2).collect();
//! let data = Dataset::new(features, labels, vec![2], 2)?;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let (train, holdout) = holdout_split(&data, 10, &mut rng)?;
//!
//! let config = TrainConfig::new().with_batch_size(10).with_learning_rate(0.05).with_seed(1);
//! let mut trainer = Trainer::new(Box::new(SoftmaxRegression::new(2, 2)?), config)?;
//! let result = trainer.train(&train, &holdout)?;
//! assert_eq!(result.steps, 15);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod optim;
pub mod params;
pub mod train;

pub use error::{Error, Result, ValidationError};
pub use params::{Parameter, ParameterSet};
