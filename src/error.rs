//! Error types for impulso
//!
//! Configuration problems are reported as [`ValidationError`] before any
//! training starts. Everything that can go wrong during a run (shape bugs,
//! non-finite gradients under the abort policy, I/O) is an [`Error`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for impulso operations
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration and dataset validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid epochs: {0} (must be > 0)")]
    InvalidEpochs(usize),

    #[error("Invalid batch size: {0} (must be > 0)")]
    InvalidBatchSize(usize),

    #[error("Invalid print period: {0} (must be > 0)")]
    InvalidPrintPeriod(usize),

    #[error("Invalid learning rate: {0} (must be finite and > 0.0)")]
    InvalidLearningRate(f32),

    #[error("Invalid momentum: {0} (must be in [0.0, 1.0))")]
    InvalidMomentum(f32),

    #[error("Invalid L2 coefficient: {0} (must be finite and >= 0.0)")]
    InvalidL2(f32),

    #[error("Invalid holdout size {holdout} for {samples} samples (must be > 0 and < samples)")]
    InvalidHoldout { holdout: usize, samples: usize },

    #[error("Batch size {batch_size} exceeds the {samples} training samples; no full batch can be formed")]
    BatchLargerThanTrainSet { batch_size: usize, samples: usize },

    #[error("Feature/label count mismatch: {features} feature rows, {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("Label {label} out of range for {num_classes} classes")]
    LabelOutOfRange { label: usize, num_classes: usize },

    #[error("Invalid label value {0} (labels must be non-negative integers)")]
    InvalidLabel(f32),

    #[error("Sample shape {shape:?} does not cover {features} features")]
    InvalidSampleShape { shape: Vec<usize>, features: usize },

    #[error("Invalid number of classes: {0} (must be >= 2)")]
    InvalidNumClasses(usize),

    #[error("Invalid hidden layer size: {0} (must be > 0)")]
    InvalidHiddenUnits(usize),

    #[error("Dataset has {actual} features per sample, model expects {expected}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("Dataset has {actual} classes, model expects {expected}")]
    ClassMismatch { expected: usize, actual: usize },

    #[error("Data file not found: {0}")]
    DataNotFound(String),

    #[error("Invalid image shape {0:?} (every dimension must be > 0)")]
    InvalidImageShape(Vec<usize>),

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Duplicate parameter name: {0}")]
    DuplicateParameter(String),
}

/// Errors raised while loading data or running training
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration or dataset rejected before training
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// A tensor reached the update step with an unexpected shape
    #[error("Shape mismatch for parameter '{parameter}': expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        parameter: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A gradient or loss became NaN/inf and the run is configured to abort
    #[error("Non-finite values in '{parameter}' at step {step}")]
    NumericInstability { step: usize, parameter: String },

    /// A parameter name is missing from the parameter set
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// Malformed data table
    #[error("Data error in {path} (row {row}): {message}")]
    Data {
        path: PathBuf,
        row: usize,
        message: String,
    },

    /// IO error with context
    #[error("IO error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV reader/writer error
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// YAML parse error
    #[error("Failed to parse YAML config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl Error {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Check if this error is caused by user input rather than a bug
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Data { .. } | Self::Csv { .. } | Self::Yaml { .. }
        )
    }
}
