//! Optimizer trait

use crate::error::Result;
use crate::params::ParameterSet;

/// Trait for optimization algorithms
pub trait Optimizer {
    /// Apply one update to every parameter from a matching gradient set
    ///
    /// Implementations must validate the whole gradient set before mutating
    /// any parameter, so a failed step leaves parameters and internal state
    /// untouched.
    fn step(&mut self, params: &mut ParameterSet, grads: &ParameterSet) -> Result<()>;

    /// Get learning rate
    fn lr(&self) -> f32;

    /// Number of successful steps taken
    fn steps(&self) -> usize;
}
