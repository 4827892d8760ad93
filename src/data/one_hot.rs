//! One-hot label indicator matrix

use crate::error::{Result, ValidationError};
use ndarray::Array2;

/// Encode integer labels as a `(labels.len(), num_classes)` indicator matrix
///
/// Each row holds a single `1.0` at the label's column.
pub fn one_hot(labels: &[usize], num_classes: usize) -> Result<Array2<f32>> {
    let mut indicator = Array2::zeros((labels.len(), num_classes));
    for (row, &label) in labels.iter().enumerate() {
        if label >= num_classes {
            return Err(ValidationError::LabelOutOfRange { label, num_classes }.into());
        }
        indicator[[row, label]] = 1.0;
    }
    Ok(indicator)
}
