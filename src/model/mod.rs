//! Forward-pass evaluators
//!
//! The training loop never differentiates anything itself. It asks a
//! [`ForwardModel`] for class probabilities, the data loss and one gradient
//! per parameter, all computed from a single read-only view of the
//! parameters. Two closed-form evaluators are provided:
//!
//! - [`SoftmaxRegression`]: one dense layer followed by softmax
//! - [`Mlp`]: dense → ReLU → dense → softmax
//!
//! [`numerical_gradients`] checks any evaluator against central differences.

mod gradcheck;
mod loss;
mod mlp;
mod softmax;

pub use gradcheck::numerical_gradients;
pub use loss::{cross_entropy_with_logits, softmax_rows};
pub use mlp::Mlp;
pub use softmax::SoftmaxRegression;

use crate::error::{Result, ValidationError};
use crate::params::ParameterSet;
use ndarray::{Array2, ArrayView2};
use rand::RngCore;

/// Output of a forward + backward pass over one batch
#[derive(Debug, Clone)]
pub struct ForwardPass {
    /// Class probabilities, one row per sample
    pub probs: Array2<f32>,
    /// Summed cross-entropy over the batch (no regularization)
    pub loss: f32,
    /// Gradient of `loss` for every parameter, aligned with the parameter set
    pub grads: ParameterSet,
}

/// Output of a gradient-free evaluation
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Class probabilities, one row per sample
    pub probs: Array2<f32>,
    /// Summed cross-entropy (no regularization)
    pub loss: f32,
}

/// A differentiable classifier
pub trait ForwardModel {
    /// Short model name for logs
    fn name(&self) -> &'static str;

    /// Flattened input features expected per sample
    fn num_features(&self) -> usize;

    /// Number of output classes
    fn num_classes(&self) -> usize;

    /// Fresh parameters for this architecture
    fn init_params(&self, rng: &mut dyn RngCore) -> Result<ParameterSet>;

    /// Unnormalized class scores
    fn logits(&self, inputs: ArrayView2<'_, f32>, params: &ParameterSet) -> Result<Array2<f32>>;

    /// Probabilities, summed cross-entropy and parameter gradients
    fn forward(
        &self,
        inputs: ArrayView2<'_, f32>,
        targets: ArrayView2<'_, f32>,
        params: &ParameterSet,
    ) -> Result<ForwardPass>;

    /// Class probabilities
    fn predict(&self, inputs: ArrayView2<'_, f32>, params: &ParameterSet) -> Result<Array2<f32>> {
        let logits = self.logits(inputs, params)?;
        Ok(softmax_rows(logits.view()))
    }

    /// Probabilities and summed cross-entropy without gradients
    fn evaluate(
        &self,
        inputs: ArrayView2<'_, f32>,
        targets: ArrayView2<'_, f32>,
        params: &ParameterSet,
    ) -> Result<Evaluation> {
        check_targets(targets, inputs.nrows(), self.num_classes())?;
        let logits = self.logits(inputs, params)?;
        Ok(Evaluation {
            probs: softmax_rows(logits.view()),
            loss: cross_entropy_with_logits(logits.view(), targets),
        })
    }
}

pub(crate) fn check_inputs(inputs: ArrayView2<'_, f32>, num_features: usize) -> Result<()> {
    if inputs.ncols() != num_features {
        return Err(ValidationError::FeatureMismatch {
            expected: num_features,
            actual: inputs.ncols(),
        }
        .into());
    }
    Ok(())
}

pub(crate) fn check_targets(
    targets: ArrayView2<'_, f32>,
    rows: usize,
    num_classes: usize,
) -> Result<()> {
    if targets.nrows() != rows {
        return Err(ValidationError::LengthMismatch {
            features: rows,
            labels: targets.nrows(),
        }
        .into());
    }
    if targets.ncols() != num_classes {
        return Err(ValidationError::FeatureMismatch {
            expected: num_classes,
            actual: targets.ncols(),
        }
        .into());
    }
    Ok(())
}

/// He-style scaled normal initialization `N(0, 1) * sqrt(2 / fan_in)`
pub(crate) fn scaled_normal(rng: &mut dyn RngCore, rows: usize, cols: usize) -> Array2<f32> {
    use rand_distr::{Distribution, StandardNormal};
    let scale = (2.0 / rows.max(1) as f32).sqrt();
    Array2::from_shape_simple_fn((rows, cols), || {
        let z: f32 = StandardNormal.sample(rng);
        z * scale
    })
}
