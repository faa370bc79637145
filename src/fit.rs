//! struct holding the fit result for one entry of the regularization path

pub mod options;

use crate::{
    design::Design,
    error::{RegressionError, RegressionResult},
    family::Family,
    num::Float,
    utility::linear_predictor,
};
use ndarray::{Array1, Array2, Axis};

/// The coefficients found for a single penalty strength.
///
/// Single-output families use one class, so `beta0` has length 1 and `beta`
/// has a single column. Categorical fits have one intercept and one
/// coefficient column per class.
#[derive(Clone, Debug, PartialEq)]
pub struct FitState<F>
where
    F: Float,
{
    /// The intercept for each class
    pub beta0: Array1<F>,
    /// The coefficients, features x classes
    pub beta: Array2<F>,
    /// The number of solver iterations taken
    pub n_iter: usize,
    /// Whether the solver met its tolerance before the iteration budget ran out
    pub converged: bool,
}

impl<F> FitState<F>
where
    F: Float,
{
    /// Build a state from an intercept per class and a features x classes
    /// coefficient matrix.
    pub fn new(beta0: Array1<F>, beta: Array2<F>) -> RegressionResult<Self> {
        if beta0.len() != beta.ncols() {
            return Err(RegressionError::BadInput(format!(
                "{} intercepts given for {} coefficient columns",
                beta0.len(),
                beta.ncols()
            )));
        }
        Ok(Self {
            beta0,
            beta,
            n_iter: 0,
            converged: false,
        })
    }

    /// A state for a single-output family from a scalar intercept and a
    /// coefficient vector.
    pub fn single(beta0: F, beta: Array1<F>) -> Self {
        Self {
            beta0: Array1::from_elem(1, beta0),
            beta: beta.insert_axis(Axis(1)),
            n_iter: 0,
            converged: false,
        }
    }

    /// The all-zero starting point of the path.
    pub fn zeros(n_features: usize, n_classes: usize) -> Self {
        Self {
            beta0: Array1::zeros(n_classes),
            beta: Array2::zeros((n_features, n_classes)),
            n_iter: 0,
            converged: false,
        }
    }

    pub fn n_features(&self) -> usize {
        self.beta.nrows()
    }

    pub fn n_classes(&self) -> usize {
        self.beta0.len()
    }

    /// The linear predictor beta0 + X * beta, samples x classes.
    pub fn linear_predictor<X>(&self, x: &X) -> RegressionResult<Array2<F>>
    where
        X: Design<F>,
    {
        if x.n_features() != self.n_features() {
            return Err(RegressionError::BadInput(format!(
                "X has {} features but the coefficients have {}",
                x.n_features(),
                self.n_features()
            )));
        }
        Ok(linear_predictor(x, &self.beta0, &self.beta))
    }

    /// The expected response for each sample (and class), samples x classes.
    pub fn predict<X>(&self, family: Family, x: &X) -> RegressionResult<Array2<F>>
    where
        X: Design<F>,
    {
        let z = self.linear_predictor(x)?;
        Ok(family.mean(z.view()))
    }

    /// The intercept and coefficients concatenated into one vector, used to
    /// measure the change between iterations.
    pub(crate) fn params(&self) -> Array1<F> {
        self.beta0.iter().chain(self.beta.iter()).cloned().collect()
    }
}
