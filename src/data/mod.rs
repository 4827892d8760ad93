//! Dataset handling
//!
//! - [`Dataset`]: labeled samples with a per-sample tensor shape
//! - [`Normalization`]: per-feature standardization (zero std → divisor 1)
//! - [`one_hot`]: label indicator matrix
//! - [`holdout_split`]: shuffle once, split off a fixed holdout
//! - [`TrainingSet`] / [`batch_ranges`]: per-epoch shuffling and minibatches
//! - [`load_csv`]: label-first CSV tables

mod batch;
mod dataset;
mod loader;
mod normalize;
mod one_hot;
mod split;

pub use batch::{batch_ranges, Batch, TrainingSet};
pub use dataset::Dataset;
pub use loader::load_csv;
pub use normalize::Normalization;
pub use one_hot::one_hot;
pub use split::holdout_split;
