//! YAML run config
//!
//! ```yaml
//! data:
//!   path: data/train.csv
//!   holdout: 1000
//!   image_shape: [1, 28, 28]
//!   num_classes: 10
//!   normalize: true
//! model:
//!   kind: mlp
//!   hidden: 300
//! training:
//!   epochs: 5
//!   batch_size: 500
//!   learning_rate: 0.001
//!   momentum: 0.9
//!   l2: 0.0
//!   print_period: 10
//! output:
//!   history_csv: out/history.csv
//! ```

use crate::train::TrainConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete description of one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    /// Dataset location and layout
    pub data: DataSpec,

    /// Evaluator architecture
    #[serde(default)]
    pub model: ModelSpec,

    /// Optimizer and loop settings
    #[serde(default)]
    pub training: TrainConfig,

    /// Where to write results
    #[serde(default)]
    pub output: OutputSpec,
}

/// Dataset configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSpec {
    /// Label-first CSV file with one header row
    pub path: PathBuf,

    /// Rows split off for holdout evaluation
    #[serde(default = "default_holdout")]
    pub holdout: usize,

    /// Per-sample tensor shape; its product is the feature count
    #[serde(default = "default_image_shape")]
    pub image_shape: Vec<usize>,

    /// Number of classes K; labels must be in `[0, K)`
    #[serde(default = "default_num_classes")]
    pub num_classes: usize,

    /// Standardize every feature column before splitting
    #[serde(default = "default_true")]
    pub normalize: bool,
}

fn default_holdout() -> usize {
    1000
}

fn default_image_shape() -> Vec<usize> {
    vec![1, 28, 28]
}

fn default_num_classes() -> usize {
    10
}

fn default_true() -> bool {
    true
}

/// Built-in evaluator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Dense softmax regression
    #[default]
    Softmax,
    /// One ReLU hidden layer
    Mlp,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Softmax => write!(f, "softmax"),
            Self::Mlp => write!(f, "mlp"),
        }
    }
}

/// Model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    #[serde(default)]
    pub kind: ModelKind,

    /// Hidden units (MLP only)
    #[serde(default = "default_hidden")]
    pub hidden: usize,
}

fn default_hidden() -> usize {
    300
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            kind: ModelKind::default(),
            hidden: default_hidden(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Write the evaluation history here as CSV
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_csv: Option<PathBuf>,
}
