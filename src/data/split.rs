//! Train/holdout split

use super::Dataset;
use crate::error::{Result, ValidationError};
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle the whole dataset once, then split off the last `holdout` rows
///
/// Returns `(train, holdout)` with `len - holdout` and `holdout` rows. The
/// split is not stratified. `holdout == 0` or `holdout >= len` is rejected.
pub fn holdout_split<R: Rng + ?Sized>(
    dataset: &Dataset,
    holdout: usize,
    rng: &mut R,
) -> Result<(Dataset, Dataset)> {
    let n = dataset.len();
    if holdout == 0 || holdout >= n {
        return Err(ValidationError::InvalidHoldout {
            holdout,
            samples: n,
        }
        .into());
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    let (train_idx, holdout_idx) = order.split_at(n - holdout);

    Ok((dataset.select(train_idx), dataset.select(holdout_idx)))
}
