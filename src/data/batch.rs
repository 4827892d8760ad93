//! Minibatches and per-epoch shuffling

use ndarray::{s, Array2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::Range;

/// A training batch: feature rows and their one-hot targets
#[derive(Clone, Debug)]
pub struct Batch {
    /// Input features, one row per sample
    pub inputs: Array2<f32>,
    /// One-hot targets, one row per sample
    pub targets: Array2<f32>,
}

impl Batch {
    /// Create a new batch
    pub fn new(inputs: Array2<f32>, targets: Array2<f32>) -> Self {
        Self { inputs, targets }
    }

    /// Number of samples in the batch
    pub fn size(&self) -> usize {
        self.inputs.nrows()
    }
}

/// Row ranges for one epoch of minibatches
///
/// `floor(n / batch_size)` full batches of contiguous rows. When
/// `drop_incomplete` is false and `n` is not a multiple of `batch_size`,
/// one more short batch covers the remainder.
pub fn batch_ranges(n: usize, batch_size: usize, drop_incomplete: bool) -> Vec<Range<usize>> {
    if batch_size == 0 {
        return Vec::new();
    }
    let full = n / batch_size;
    let mut ranges: Vec<Range<usize>> = (0..full)
        .map(|j| j * batch_size..j * batch_size + batch_size)
        .collect();
    if !drop_incomplete && n % batch_size != 0 {
        ranges.push(full * batch_size..n);
    }
    ranges
}

/// Training rows paired with their indicator rows
///
/// [`shuffle`](Self::shuffle) applies one permutation to both matrices, so
/// row `i` of the features always belongs with row `i` of the targets.
#[derive(Clone, Debug)]
pub struct TrainingSet {
    inputs: Array2<f32>,
    targets: Array2<f32>,
}

impl TrainingSet {
    /// Pair features with one-hot targets; both must have the same row count
    pub fn new(inputs: Array2<f32>, targets: Array2<f32>) -> Option<Self> {
        (inputs.nrows() == targets.nrows()).then_some(Self { inputs, targets })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.inputs.nrows() == 0
    }

    /// Feature rows in current order
    pub fn inputs(&self) -> &Array2<f32> {
        &self.inputs
    }

    /// Target rows in current order
    pub fn targets(&self) -> &Array2<f32> {
        &self.targets
    }

    /// Reorder rows with a fresh random permutation
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(rng);
        self.inputs = self.inputs.select(Axis(0), &order);
        self.targets = self.targets.select(Axis(0), &order);
    }

    /// Copy rows `range` out as a batch
    pub fn batch(&self, range: Range<usize>) -> Batch {
        Batch::new(
            self.inputs.slice(s![range.clone(), ..]).to_owned(),
            self.targets.slice(s![range, ..]).to_owned(),
        )
    }
}
