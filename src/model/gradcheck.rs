//! Central-difference gradients for checking evaluators

use super::ForwardModel;
use crate::error::Result;
use crate::params::ParameterSet;
use ndarray::ArrayView2;

/// Approximate `d(loss)/d(theta)` for every parameter element
///
/// `(loss(theta + eps) - loss(theta - eps)) / (2 * eps)`, one element at a
/// time. Cost is two evaluations per scalar parameter, so keep it to toy
/// problems.
pub fn numerical_gradients(
    model: &dyn ForwardModel,
    inputs: ArrayView2<'_, f32>,
    targets: ArrayView2<'_, f32>,
    params: &ParameterSet,
    eps: f32,
) -> Result<ParameterSet> {
    let mut probe = params.clone();
    let mut grads = params.zeros_like();

    for (index, param) in params.iter().enumerate() {
        for flat in 0..param.value.len() {
            let original = param.value.iter().nth(flat).copied().unwrap_or_default();

            set_flat(&mut probe, index, flat, original + eps);
            let plus = model.evaluate(inputs, targets, &probe)?.loss;
            set_flat(&mut probe, index, flat, original - eps);
            let minus = model.evaluate(inputs, targets, &probe)?.loss;
            set_flat(&mut probe, index, flat, original);

            set_flat(&mut grads, index, flat, (plus - minus) / (2.0 * eps));
        }
    }

    Ok(grads)
}

fn set_flat(set: &mut ParameterSet, index: usize, flat: usize, value: f32) {
    if let Some(param) = set.iter_mut().nth(index) {
        if let Some(slot) = param.value.iter_mut().nth(flat) {
            *slot = value;
        }
    }
}
