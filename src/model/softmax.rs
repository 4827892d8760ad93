//! Multinomial logistic regression

use super::{
    check_inputs, check_targets, cross_entropy_with_logits, scaled_normal, softmax_rows,
    ForwardModel, ForwardPass,
};
use crate::error::{Result, ValidationError};
use crate::params::ParameterSet;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::RngCore;

/// One dense layer `x W + b` followed by softmax
///
/// Parameters: `W` of shape `[features, classes]` and `b` of shape `[classes]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftmaxRegression {
    num_features: usize,
    num_classes: usize,
}

impl SoftmaxRegression {
    pub fn new(num_features: usize, num_classes: usize) -> Result<Self> {
        if num_classes < 2 {
            return Err(ValidationError::InvalidNumClasses(num_classes).into());
        }
        if num_features == 0 {
            return Err(ValidationError::FeatureMismatch {
                expected: 1,
                actual: 0,
            }
            .into());
        }
        Ok(Self {
            num_features,
            num_classes,
        })
    }
}

impl ForwardModel for SoftmaxRegression {
    fn name(&self) -> &'static str {
        "softmax"
    }

    fn num_features(&self) -> usize {
        self.num_features
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn init_params(&self, rng: &mut dyn RngCore) -> Result<ParameterSet> {
        ParameterSet::new()
            .with("W", scaled_normal(rng, self.num_features, self.num_classes))?
            .with("b", Array1::<f32>::zeros(self.num_classes))
    }

    fn logits(&self, inputs: ArrayView2<'_, f32>, params: &ParameterSet) -> Result<Array2<f32>> {
        check_inputs(inputs, self.num_features)?;
        let w = params.matrix_of("W", self.num_features, self.num_classes)?;
        let b = params.vector_of("b", self.num_classes)?;
        Ok(inputs.dot(&w) + &b)
    }

    fn forward(
        &self,
        inputs: ArrayView2<'_, f32>,
        targets: ArrayView2<'_, f32>,
        params: &ParameterSet,
    ) -> Result<ForwardPass> {
        check_targets(targets, inputs.nrows(), self.num_classes)?;
        let logits = self.logits(inputs, params)?;
        let probs = softmax_rows(logits.view());
        let loss = cross_entropy_with_logits(logits.view(), targets);

        // d(loss)/d(logits) = probs - targets
        let delta = &probs - &targets;
        let grads = ParameterSet::new()
            .with("W", inputs.t().dot(&delta))?
            .with("b", delta.sum_axis(Axis(0)))?;

        Ok(ForwardPass { probs, loss, grads })
    }
}
