//! Per-feature standardization

use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};

/// Per-feature mean and standard deviation
///
/// Features with zero standard deviation get a divisor of 1, so a constant
/// column maps to all zeros instead of NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalization {
    mean: Array1<f32>,
    std: Array1<f32>,
}

impl Normalization {
    /// Fit mean and population standard deviation for every column
    pub fn fit(features: ArrayView2<'_, f32>) -> Self {
        let n = features.nrows().max(1) as f64;
        let cols = features.ncols();
        let mut mean = Array1::<f32>::zeros(cols);
        let mut std = Array1::<f32>::ones(cols);

        for (j, column) in features.axis_iter(Axis(1)).enumerate() {
            // Accumulate in f64
            let mu = column.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
            let var = column
                .iter()
                .map(|&v| {
                    let d = f64::from(v) - mu;
                    d * d
                })
                .sum::<f64>()
                / n;
            let sigma = var.sqrt();
            mean[j] = mu as f32;
            std[j] = if sigma == 0.0 { 1.0 } else { sigma as f32 };
        }

        Self { mean, std }
    }

    /// Number of features this normalization was fitted on
    pub fn num_features(&self) -> usize {
        self.mean.len()
    }

    /// Per-feature means
    pub fn mean(&self) -> &Array1<f32> {
        &self.mean
    }

    /// Per-feature divisors (1 where the fitted std was 0)
    pub fn std(&self) -> &Array1<f32> {
        &self.std
    }

    /// Standardize rows in place: `(x - mean) / std`
    ///
    /// `features` must have the fitted width.
    pub(crate) fn apply(&self, features: &mut Array2<f32>) {
        for mut row in features.axis_iter_mut(Axis(0)) {
            Zip::from(&mut row)
                .and(&self.mean)
                .and(&self.std)
                .for_each(|x, &m, &s| *x = (*x - m) / s);
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalized_values_are_finite(
            rows in prop::collection::vec(prop::collection::vec(-1e3f32..1e3, 3), 1..20)
        ) {
            let n = rows.len();
            let flat: Vec<f32> = rows.into_iter().flatten().collect();
            let mut x = Array2::from_shape_vec((n, 3), flat).unwrap();
            let norm = Normalization::fit(x.view());
            norm.apply(&mut x);
            prop_assert!(x.iter().all(|v| v.is_finite()));
        }
    }
}
