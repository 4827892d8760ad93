//! One-hidden-layer perceptron

use super::{
    check_inputs, check_targets, cross_entropy_with_logits, scaled_normal, softmax_rows,
    ForwardModel, ForwardPass,
};
use crate::error::{Result, ValidationError};
use crate::params::ParameterSet;
use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};
use rand::RngCore;

/// `relu(x W1 + b1) W2 + b2` followed by softmax
///
/// Parameters: `W1 [features, hidden]`, `b1 [hidden]`, `W2 [hidden, classes]`,
/// `b2 [classes]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mlp {
    num_features: usize,
    hidden: usize,
    num_classes: usize,
}

impl Mlp {
    pub fn new(num_features: usize, hidden: usize, num_classes: usize) -> Result<Self> {
        if num_classes < 2 {
            return Err(ValidationError::InvalidNumClasses(num_classes).into());
        }
        if hidden == 0 {
            return Err(ValidationError::InvalidHiddenUnits(hidden).into());
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
            hidden,
            num_classes,
        })
    }

    /// Hidden layer width
    pub fn hidden(&self) -> usize {
        self.hidden
    }

    /// Pre-activation and activation of the hidden layer
    fn hidden_layer(
        &self,
        inputs: ArrayView2<'_, f32>,
        params: &ParameterSet,
    ) -> Result<(Array2<f32>, Array2<f32>)> {
        check_inputs(inputs, self.num_features)?;
        let w1 = params.matrix_of("W1", self.num_features, self.hidden)?;
        let b1 = params.vector_of("b1", self.hidden)?;
        let pre = inputs.dot(&w1) + &b1;
        let act = pre.mapv(|v| v.max(0.0));
        Ok((pre, act))
    }
}

impl ForwardModel for Mlp {
    fn name(&self) -> &'static str {
        "mlp"
    }

    fn num_features(&self) -> usize {
        self.num_features
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn init_params(&self, rng: &mut dyn RngCore) -> Result<ParameterSet> {
        ParameterSet::new()
            .with("W1", scaled_normal(rng, self.num_features, self.hidden))?
            .with("b1", Array1::<f32>::zeros(self.hidden))?
            .with("W2", scaled_normal(rng, self.hidden, self.num_classes))?
            .with("b2", Array1::<f32>::zeros(self.num_classes))
    }

    fn logits(&self, inputs: ArrayView2<'_, f32>, params: &ParameterSet) -> Result<Array2<f32>> {
        let (_, act) = self.hidden_layer(inputs, params)?;
        let w2 = params.matrix_of("W2", self.hidden, self.num_classes)?;
        let b2 = params.vector_of("b2", self.num_classes)?;
        Ok(act.dot(&w2) + &b2)
    }

    fn forward(
        &self,
        inputs: ArrayView2<'_, f32>,
        targets: ArrayView2<'_, f32>,
        params: &ParameterSet,
    ) -> Result<ForwardPass> {
        check_targets(targets, inputs.nrows(), self.num_classes)?;
        let (pre, act) = self.hidden_layer(inputs, params)?;
        let w2 = params.matrix_of("W2", self.hidden, self.num_classes)?;
        let b2 = params.vector_of("b2", self.num_classes)?;
        let logits = act.dot(&w2) + &b2;
        let probs = softmax_rows(logits.view());
        let loss = cross_entropy_with_logits(logits.view(), targets);

        let delta_out = &probs - &targets;
        let mut delta_hidden = delta_out.dot(&w2.t());
        Zip::from(&mut delta_hidden)
            .and(&pre)
            .for_each(|d, &z| {
                if z <= 0.0 {
                    *d = 0.0;
                }
            });

        let grads = ParameterSet::new()
            .with("W1", inputs.t().dot(&delta_hidden))?
            .with("b1", delta_hidden.sum_axis(Axis(0)))?
            .with("W2", act.t().dot(&delta_out))?
            .with("b2", delta_out.sum_axis(Axis(0)))?;

        Ok(ForwardPass { probs, loss, grads })
    }
}
