//! Classification metrics over argmax predictions

use ndarray::ArrayView2;

/// Index of the largest entry in each row
///
/// Ties resolve to the lowest index. NaN entries never win.
pub fn argmax_rows(values: ArrayView2<'_, f32>) -> Vec<usize> {
    values
        .rows()
        .into_iter()
        .map(|row| {
            let mut best = 0;
            let mut best_value = f32::NEG_INFINITY;
            for (j, &v) in row.iter().enumerate() {
                if v > best_value {
                    best = j;
                    best_value = v;
                }
            }
            best
        })
        .collect()
}

/// Fraction of rows where `argmax(probs) != argmax(targets)`
///
/// Returns 0.0 for an empty batch.
pub fn error_rate(probs: ArrayView2<'_, f32>, targets: ArrayView2<'_, f32>) -> f32 {
    let n = probs.nrows();
    if n == 0 {
        return 0.0;
    }
    let wrong = argmax_rows(probs)
        .into_iter()
        .zip(argmax_rows(targets))
        .filter(|(p, t)| p != t)
        .count();
    wrong as f32 / n as f32
}
