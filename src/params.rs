//! Named parameter tensors
//!
//! A [`ParameterSet`] is an ordered list of named `f32` tensors (weights and
//! biases). The same type carries gradients: a forward pass returns a
//! `ParameterSet` whose entries line up name-for-name with the parameters.

use crate::error::{Error, Result, ValidationError};
use ndarray::{ArrayD, ArrayView1, ArrayView2, Ix1, Ix2};

/// A single named tensor
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name (e.g. `W1`, `b1`)
    pub name: String,
    /// Tensor value
    pub value: ArrayD<f32>,
}

impl Parameter {
    /// Shape of the tensor
    pub fn shape(&self) -> &[usize] {
        self.value.shape()
    }
}

/// Ordered collection of named tensors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    entries: Vec<Parameter>,
}

impl ParameterSet {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named tensor; names must be unique
    pub fn push<D>(&mut self, name: impl Into<String>, value: ndarray::Array<f32, D>) -> Result<()>
    where
        D: ndarray::Dimension,
    {
        let name = name.into();
        if self.entries.iter().any(|p| p.name == name) {
            return Err(ValidationError::DuplicateParameter(name).into());
        }
        self.entries.push(Parameter {
            name,
            value: value.into_dyn(),
        });
        Ok(())
    }

    /// Builder-style variant of [`push`](Self::push)
    pub fn with<D>(mut self, name: impl Into<String>, value: ndarray::Array<f32, D>) -> Result<Self>
    where
        D: ndarray::Dimension,
    {
        self.push(name, value)?;
        Ok(self)
    }

    /// A set with the same names and shapes, filled with zeros
    pub fn zeros_like(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|p| Parameter {
                    name: p.name.clone(),
                    value: ArrayD::zeros(p.value.raw_dim()),
                })
                .collect(),
        }
    }

    /// Number of tensors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no tensors
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of scalar values across all tensors
    pub fn num_elements(&self) -> usize {
        self.entries.iter().map(|p| p.value.len()).sum()
    }

    /// Iterate over parameters in order
    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Parameter> {
        self.entries.iter_mut()
    }

    /// Parameter names in order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|p| p.name.as_str()).collect()
    }

    /// Tensor shapes in order
    pub fn shapes(&self) -> Vec<Vec<usize>> {
        self.entries.iter().map(|p| p.shape().to_vec()).collect()
    }

    /// Look up a tensor by name
    pub fn get(&self, name: &str) -> Result<&ArrayD<f32>> {
        self.entries
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))
    }

    /// Mutable lookup by name
    pub fn get_mut(&mut self, name: &str) -> Result<&mut ArrayD<f32>> {
        self.entries
            .iter_mut()
            .find(|p| p.name == name)
            .map(|p| &mut p.value)
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))
    }

    /// View a named tensor as a matrix
    pub fn matrix(&self, name: &str) -> Result<ArrayView2<'_, f32>> {
        let value = self.get(name)?;
        value
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| Error::ShapeMismatch {
                parameter: name.to_string(),
                expected: vec![0, 0],
                actual: value.shape().to_vec(),
            })
    }

    /// View a named tensor as a vector
    pub fn vector(&self, name: &str) -> Result<ArrayView1<'_, f32>> {
        let value = self.get(name)?;
        value
            .view()
            .into_dimensionality::<Ix1>()
            .map_err(|_| Error::ShapeMismatch {
                parameter: name.to_string(),
                expected: vec![0],
                actual: value.shape().to_vec(),
            })
    }

    /// View a named tensor as a `rows x cols` matrix
    pub fn matrix_of(&self, name: &str, rows: usize, cols: usize) -> Result<ArrayView2<'_, f32>> {
        let view = self.matrix(name)?;
        if view.dim() != (rows, cols) {
            return Err(Error::ShapeMismatch {
                parameter: name.to_string(),
                expected: vec![rows, cols],
                actual: view.shape().to_vec(),
            });
        }
        Ok(view)
    }

    /// View a named tensor as a vector of length `len`
    pub fn vector_of(&self, name: &str, len: usize) -> Result<ArrayView1<'_, f32>> {
        let view = self.vector(name)?;
        if view.len() != len {
            return Err(Error::ShapeMismatch {
                parameter: name.to_string(),
                expected: vec![len],
                actual: view.shape().to_vec(),
            });
        }
        Ok(view)
    }

    /// Sum of squared values over every tensor
    pub fn squared_norm(&self) -> f32 {
        self.entries
            .iter()
            .map(|p| p.value.iter().map(|v| v * v).sum::<f32>())
            .sum()
    }

    /// L2 penalty `lambda * sum(||theta||^2)`
    ///
    /// Returns exactly `0.0` when `lambda == 0.0`, whatever the parameter
    /// magnitudes (`0 * inf` would otherwise be NaN).
    pub fn l2_penalty(&self, lambda: f32) -> f32 {
        if lambda == 0.0 {
            return 0.0;
        }
        lambda * self.squared_norm()
    }

    /// Add the L2 gradient `2 * lambda * theta` to matching gradient tensors
    pub fn add_l2_gradient(&self, grads: &mut ParameterSet, lambda: f32) -> Result<()> {
        if lambda == 0.0 {
            return Ok(());
        }
        check_aligned(self, grads)?;
        for (param, grad) in self.entries.iter().zip(grads.entries.iter_mut()) {
            grad.value.zip_mut_with(&param.value, |g, &p| *g += 2.0 * lambda * p);
        }
        Ok(())
    }

    /// Name of the first tensor holding a NaN or infinity
    pub fn first_non_finite(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|p| p.value.iter().any(|v| !v.is_finite()))
            .map(|p| p.name.as_str())
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Check that two sets have the same names and shapes in the same order
pub fn check_aligned(expected: &ParameterSet, actual: &ParameterSet) -> Result<()> {
    if expected.len() != actual.len() {
        return Err(Error::ShapeMismatch {
            parameter: "<parameter set>".to_string(),
            expected: vec![expected.len()],
            actual: vec![actual.len()],
        });
    }
    for (e, a) in expected.iter().zip(actual.iter()) {
        if e.name != a.name {
            return Err(Error::UnknownParameter(a.name.clone()));
        }
        if e.shape() != a.shape() {
            return Err(Error::ShapeMismatch {
                parameter: e.name.clone(),
                expected: e.shape().to_vec(),
                actual: a.shape().to_vec(),
            });
        }
    }
    Ok(())
}
