//! Softmax and cross-entropy over row-major logits

use ndarray::{Array2, ArrayView2, Axis, Zip};

/// Row-wise softmax: `exp(x_i - max) / sum(exp(x_j - max))`
pub fn softmax_rows(logits: ArrayView2<'_, f32>) -> Array2<f32> {
    let mut probs = logits.to_owned();
    for mut row in probs.axis_iter_mut(Axis(0)) {
        let max = row.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
    probs
}

/// Summed cross-entropy `-sum(targets * log_softmax(logits))`
///
/// Uses log-sum-exp, so a confident wrong prediction yields a large finite
/// loss instead of `inf`.
pub fn cross_entropy_with_logits(logits: ArrayView2<'_, f32>, targets: ArrayView2<'_, f32>) -> f32 {
    let mut total = 0.0f32;
    for (row, target) in logits.axis_iter(Axis(0)).zip(targets.axis_iter(Axis(0))) {
        let max = row.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        let lse = max + row.iter().map(|&v| (v - max).exp()).sum::<f32>().ln();
        total -= Zip::from(&row)
            .and(&target)
            .fold(0.0f32, |acc, &z, &t| acc + t * (z - lse));
    }
    total
}
