//! Evaluation metrics for holdout scoring

mod classification;

pub use classification::{argmax_rows, error_rate};
