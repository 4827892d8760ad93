//! Labeled image dataset

use super::normalize::Normalization;
use super::one_hot::one_hot;
use crate::error::{Result, ValidationError};
use ndarray::{Array2, ArrayViewD, Axis, IxDyn};

/// Labeled samples stored as flattened rows
///
/// Row `i` of `features` is sample `i` flattened in row-major order;
/// [`sample`](Self::sample) views it back with the per-sample shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f32>,
    labels: Vec<usize>,
    sample_shape: Vec<usize>,
    num_classes: usize,
}

impl Dataset {
    /// Create a dataset, checking counts, shapes and label ranges
    pub fn new(
        features: Array2<f32>,
        labels: Vec<usize>,
        sample_shape: Vec<usize>,
        num_classes: usize,
    ) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(ValidationError::LengthMismatch {
                features: features.nrows(),
                labels: labels.len(),
            }
            .into());
        }
        if num_classes < 2 {
            return Err(ValidationError::InvalidNumClasses(num_classes).into());
        }
        if sample_shape.iter().product::<usize>() != features.ncols() {
            return Err(ValidationError::InvalidSampleShape {
                shape: sample_shape,
                features: features.ncols(),
            }
            .into());
        }
        if let Some(&label) = labels.iter().find(|&&l| l >= num_classes) {
            return Err(ValidationError::LabelOutOfRange { label, num_classes }.into());
        }
        Ok(Self {
            features,
            labels,
            sample_shape,
            num_classes,
        })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the dataset holds no samples
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Flattened features per sample
    pub fn num_features(&self) -> usize {
        self.features.ncols()
    }

    /// Number of label classes
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Per-sample tensor shape
    pub fn sample_shape(&self) -> &[usize] {
        &self.sample_shape
    }

    /// Feature matrix, one row per sample
    pub fn features(&self) -> &Array2<f32> {
        &self.features
    }

    /// Integer labels
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Sample `index` viewed with its multi-dimensional shape
    pub fn sample(&self, index: usize) -> Option<ArrayViewD<'_, f32>> {
        if index >= self.len() {
            return None;
        }
        self.features
            .row(index)
            .into_shape_with_order(IxDyn(&self.sample_shape))
            .ok()
    }

    /// One-hot label indicator matrix of shape `(len, num_classes)`
    pub fn indicator_matrix(&self) -> Result<Array2<f32>> {
        one_hot(&self.labels, self.num_classes)
    }

    /// Rows selected by index, in the given order
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            sample_shape: self.sample_shape.clone(),
            num_classes: self.num_classes,
        }
    }

    /// Fit a normalization on this dataset and apply it in place
    pub fn normalize(&mut self) -> Normalization {
        let norm = Normalization::fit(self.features.view());
        norm.apply(&mut self.features);
        norm
    }
}

pub(crate) fn label_from_f32(value: f32) -> std::result::Result<usize, ValidationError> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Ok(value as usize)
    } else {
        Err(ValidationError::InvalidLabel(value))
    }
}
