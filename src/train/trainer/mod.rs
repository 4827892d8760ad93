//! Minibatch training loop
//!
//! [`Trainer`] owns the parameter set, the optimizer state and the metrics
//! history for one run:
//! - [`Trainer::train_step`]: one forward pass, L2 term, optimizer update
//! - [`Trainer::evaluate`]: read-only holdout loss and error rate
//! - [`Trainer::train`]: shuffled epochs with periodic holdout evaluation
//!
//! # Example
//!
//! ```no_run
//! use impulso::data::{holdout_split, load_csv};
//! use impulso::model::SoftmaxRegression;
//! use impulso::train::{ProgressCallback, TrainConfig, Trainer};
//! use rand::SeedableRng;
//!
//! # fn main() -> impulso::Result<()> {
//! let mut data = load_csv("train.csv", vec![1, 28, 28], 10)?;
//! data.normalize();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let (train, holdout) = holdout_split(&data, 1000, &mut rng)?;
//!
//! let model = SoftmaxRegression::new(train.num_features(), 10)?;
//! let config = TrainConfig::new().with_batch_size(500).with_seed(7);
//! let mut trainer = Trainer::new(Box::new(model), config)?;
//! trainer.add_callback(ProgressCallback::default());
//!
//! let result = trainer.train(&train, &holdout)?;
//! println!("holdout error {:.3}", result.final_error);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::field_reassign_with_default)]

mod core;
mod evaluate;
mod result;
mod step;
mod train_loop;

pub use core::Trainer;
pub use evaluate::Score;
pub use result::TrainResult;
pub use step::StepOutcome;
