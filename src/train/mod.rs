//! High-level training loop
//!
//! - [`TrainConfig`]: epochs, batch size, learning rate, momentum, L2, cadence
//! - [`Trainer`]: shuffled minibatch epochs with momentum SGD
//! - [`MetricsHistory`]: append-only holdout loss / error records
//! - [`callback`]: progress logging, early stopping, cancellation
//!
//! # Example
//!
//! ```
//! use impulso::data::Dataset;
//! use impulso::model::SoftmaxRegression;
//! use impulso::train::{TrainConfig, Trainer};
//! use ndarray::array;
//!
//! # fn main() -> impulso::Result<()> {
//! let features = array![[-1.0f32, 0.0], [1.0, 0.0], [-1.0, 0.5], [1.0, 0.5]];
//! let train = Dataset::new(features.clone(), vec![0, 1, 0, 1], vec![2], 2)?;
//! let holdout = Dataset::new(features, vec![0, 1, 0, 1], vec![2], 2)?;
//!
//! let config = TrainConfig::new()
//!     .with_epochs(3)
//!     .with_batch_size(2)
//!     .with_print_period(1)
//!     .with_seed(0);
//! let mut trainer = Trainer::new(Box::new(SoftmaxRegression::new(2, 2)?), config)?;
//! let result = trainer.train(&train, &holdout)?;
//!
//! assert_eq!(result.steps, 6);
//! assert_eq!(trainer.history().len(), 6);
//! # Ok(())
//! # }
//! ```

pub mod callback;
mod config;
mod history;
mod metrics;
mod trainer;

pub use callback::{
    CallbackAction, CallbackContext, CallbackManager, CancellationToken, EarlyStopping,
    ProgressCallback, TrainerCallback,
};
pub use config::TrainConfig;
pub use history::{EvalRecord, MetricsHistory};
pub use metrics::{argmax_rows, error_rate};
pub use trainer::{Score, StepOutcome, TrainResult, Trainer};
