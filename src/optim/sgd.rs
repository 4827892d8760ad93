//! Stochastic Gradient Descent optimizer

use super::{NonFinitePolicy, Optimizer};
use crate::error::{Error, Result};
use crate::params::{check_aligned, ParameterSet};
use ndarray::Zip;
use tracing::{instrument, warn};

/// SGD optimizer with classic (heavy-ball) momentum
///
/// For every parameter `theta` with gradient `g`:
///
/// ```text
/// v     = momentum * v - lr * g
/// theta = theta + v
/// ```
///
/// Gradients are evaluated at the current parameters, not a look-ahead point.
/// Velocities start at zero and keep the shape of their parameter.
pub struct SGD {
    lr: f32,
    momentum: f32,
    velocities: Option<ParameterSet>,
    on_non_finite: NonFinitePolicy,
    steps: usize,
}

impl SGD {
    /// Create a new SGD optimizer
    pub fn new(lr: f32, momentum: f32) -> Self {
        Self {
            lr,
            momentum,
            velocities: None,
            on_non_finite: NonFinitePolicy::default(),
            steps: 0,
        }
    }

    /// Set how NaN/inf gradients are handled
    pub fn with_non_finite_policy(mut self, policy: NonFinitePolicy) -> Self {
        self.on_non_finite = policy;
        self
    }

    /// Current velocities (`None` before the first step)
    pub fn velocities(&self) -> Option<&ParameterSet> {
        self.velocities.as_ref()
    }

    /// Scan gradients according to the configured policy
    fn check_finite(&self, grads: &ParameterSet) -> Result<()> {
        if !self.on_non_finite.checks() {
            return Ok(());
        }
        if let Some(name) = grads.first_non_finite() {
            match self.on_non_finite {
                NonFinitePolicy::Abort => {
                    return Err(Error::NumericInstability {
                        step: self.steps,
                        parameter: name.to_string(),
                    });
                }
                NonFinitePolicy::Warn => {
                    warn!(step = self.steps, parameter = name, "non-finite gradient");
                }
                NonFinitePolicy::Ignore => {}
            }
        }
        Ok(())
    }
}

impl Optimizer for SGD {
    #[instrument(level = "debug", skip_all, fields(step = self.steps, lr = self.lr))]
    fn step(&mut self, params: &mut ParameterSet, grads: &ParameterSet) -> Result<()> {
        // Validate everything before the first write
        check_aligned(params, grads)?;
        let velocities = match self.velocities.take() {
            Some(v) => v,
            None => params.zeros_like(),
        };
        if let Err(e) = check_aligned(params, &velocities) {
            self.velocities = Some(velocities);
            return Err(e);
        }
        if let Err(e) = self.check_finite(grads) {
            self.velocities = Some(velocities);
            return Err(e);
        }

        let mut velocities = velocities;
        let (lr, momentum) = (self.lr, self.momentum);
        for ((param, grad), velocity) in params
            .iter_mut()
            .zip(grads.iter())
            .zip(velocities.iter_mut())
        {
            Zip::from(&mut param.value)
                .and(&mut velocity.value)
                .and(&grad.value)
                .for_each(|theta, v, &g| {
                    *v = momentum * *v - lr * g;
                    *theta += *v;
                });
        }

        self.velocities = Some(velocities);
        self.steps += 1;
        Ok(())
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn steps(&self) -> usize {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2, Array1};

    fn single(values: &[f32]) -> ParameterSet {
        ParameterSet::new().with("w", arr1(values)).unwrap()
    }

    #[test]
    fn test_zero_momentum_is_plain_gradient_descent() {
        let mut opt = SGD::new(0.1, 0.0);
        let mut params = single(&[1.0, -2.0, 3.0]);
        let before = params.vector("w").unwrap().to_owned();
        let g = arr1(&[0.5f32, 1.0, -1.5]);

        opt.step(&mut params, &single(g.as_slice().unwrap())).unwrap();

        let after = params.vector("w").unwrap();
        for i in 0..3 {
            assert_eq!(after[i], before[i] - 0.1 * g[i]);
        }
    }

    #[test]
    fn test_velocity_matches_closed_form_recurrence() {
        let (lr, mu) = (0.05f32, 0.9f32);
        let mut opt = SGD::new(lr, mu);
        let mut params = single(&[0.0]);
        let grads = [1.0f32, -2.0, 0.5, 3.0, 0.0];

        let mut v_expected = 0.0f32;
        let mut theta_expected = 0.0f32;
        for &g in &grads {
            opt.step(&mut params, &single(&[g])).unwrap();
            v_expected = mu * v_expected - lr * g;
            theta_expected += v_expected;

            let v = opt.velocities().unwrap().vector("w").unwrap()[0];
            assert_relative_eq!(v, v_expected, epsilon = 1e-6);
            assert_relative_eq!(params.vector("w").unwrap()[0], theta_expected, epsilon = 1e-6);
        }
        assert_eq!(opt.steps(), grads.len());
    }

    #[test]
    fn test_constant_gradient_geometric_sum() {
        // v_n = -lr * g * (1 - mu^n) / (1 - mu)
        let (lr, mu, g) = (0.1f32, 0.5f32, 2.0f32);
        let mut opt = SGD::new(lr, mu);
        let mut params = single(&[0.0]);
        for n in 1..=6 {
            opt.step(&mut params, &single(&[g])).unwrap();
            let expected = -lr * g * (1.0 - mu.powi(n)) / (1.0 - mu);
            let v = opt.velocities().unwrap().vector("w").unwrap()[0];
            assert_relative_eq!(v, expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_shapes_preserved() {
        let mut opt = SGD::new(0.01, 0.9);
        let mut params = ParameterSet::new()
            .with("W", arr2(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]))
            .unwrap()
            .with("b", Array1::zeros(2))
            .unwrap();
        let shapes = params.shapes();
        let grads = params.zeros_like();
        for _ in 0..10 {
            opt.step(&mut params, &grads).unwrap();
        }
        assert_eq!(params.shapes(), shapes);
        assert_eq!(opt.velocities().unwrap().shapes(), shapes);
    }

    #[test]
    fn test_shape_mismatch_leaves_state_untouched() {
        let mut opt = SGD::new(0.1, 0.9);
        let mut params = ParameterSet::new()
            .with("a", arr1(&[1.0, 1.0]))
            .unwrap()
            .with("b", arr1(&[1.0]))
            .unwrap();
        let bad = ParameterSet::new()
            .with("a", arr1(&[1.0, 1.0]))
            .unwrap()
            .with("b", arr1(&[1.0, 2.0]))
            .unwrap();

        let err = opt.step(&mut params, &bad).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { ref parameter, .. } if parameter == "b"));
        assert_eq!(params.vector("a").unwrap().to_vec(), vec![1.0, 1.0]);
        assert_eq!(opt.steps(), 0);
    }

    #[test]
    fn test_abort_policy_rejects_before_mutation() {
        let mut opt = SGD::new(0.1, 0.9).with_non_finite_policy(NonFinitePolicy::Abort);
        let mut params = ParameterSet::new()
            .with("a", arr1(&[1.0]))
            .unwrap()
            .with("b", arr1(&[1.0]))
            .unwrap();
        let zeros = params.zeros_like();
        opt.step(&mut params, &zeros).unwrap();

        let grads = ParameterSet::new()
            .with("a", arr1(&[0.5]))
            .unwrap()
            .with("b", arr1(&[f32::NAN]))
            .unwrap();
        let err = opt.step(&mut params, &grads).unwrap_err();

        assert!(matches!(
            err,
            Error::NumericInstability { step: 1, ref parameter } if parameter == "b"
        ));
        // "a" comes first but must not have been updated
        assert_eq!(params.vector("a").unwrap()[0], 1.0);
        assert!(opt.velocities().is_some());
        assert_eq!(opt.steps(), 1);
    }

    #[test]
    fn test_ignore_policy_propagates_nan() {
        let mut opt = SGD::new(0.1, 0.9);
        let mut params = single(&[1.0, 2.0]);
        opt.step(&mut params, &single(&[f32::NAN, 0.0])).unwrap();
        assert!(params.vector("w").unwrap()[0].is_nan());
        assert_eq!(params.vector("w").unwrap()[1], 2.0);

        // NaN velocity keeps poisoning the parameter afterwards
        opt.step(&mut params, &single(&[0.0, 0.0])).unwrap();
        assert!(params.vector("w").unwrap()[0].is_nan());
    }

    #[test]
    fn test_warn_policy_applies_update() {
        let mut opt = SGD::new(0.1, 0.0).with_non_finite_policy(NonFinitePolicy::Warn);
        let mut params = single(&[1.0]);
        opt.step(&mut params, &single(&[f32::INFINITY])).unwrap();
        assert_eq!(params.vector("w").unwrap()[0], f32::NEG_INFINITY);
    }

    #[test]
    fn test_momentum_travels_further_on_constant_slope() {
        let mut with = single(&[0.0]);
        let mut without = single(&[0.0]);
        let mut opt_with = SGD::new(0.1, 0.9);
        let mut opt_without = SGD::new(0.1, 0.0);
        let slope = single(&[1.0]);
        for _ in 0..20 {
            opt_with.step(&mut with, &slope).unwrap();
            opt_without.step(&mut without, &slope).unwrap();
        }
        assert_relative_eq!(without.vector("w").unwrap()[0], -2.0, epsilon = 1e-5);
        assert!(with.vector("w").unwrap()[0] < without.vector("w").unwrap()[0]);
    }
}
