//! Numeric hyperparameters shared by the solvers
use crate::{
    error::{RegressionError, RegressionResult},
    num::Float,
};

/// Specifies the fitting options
#[derive(Clone, Debug, PartialEq)]
pub struct FitOptions<F>
where
    F: Float,
{
    /// The step size of the batch proximal-gradient solver
    pub learning_rate: F,
    /// The maximum number of iterations (batch steps or coordinate sweeps)
    /// for each entry of the path
    pub max_iter: usize,
    /// The convergence tolerance. For batch gradient it bounds the relative
    /// change of the parameters, for coordinate descent the largest absolute
    /// coefficient change in a sweep.
    pub tol: F,
    /// How many times a batch step may be halved in search of a decrease of
    /// the objective
    pub max_step_halves: usize,
    /// Seed for the random number generator used in simulation
    pub random_state: u64,
}

impl<F> FitOptions<F>
where
    F: Float,
{
    pub(crate) fn validate(&self) -> RegressionResult<()> {
        if !(self.learning_rate > F::zero()) || !self.learning_rate.is_finite() {
            return Err(RegressionError::BadInput(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.tol >= F::zero()) {
            return Err(RegressionError::BadInput(format!(
                "tolerance must be non-negative, got {}",
                self.tol
            )));
        }
        Ok(())
    }
}

impl<F> Default for FitOptions<F>
where
    F: Float,
{
    fn default() -> Self {
        Self {
            learning_rate: F::lit(2e-1),
            max_iter: 1000,
            tol: F::lit(1e-3),
            max_step_halves: 50,
            random_state: 0,
        }
    }
}
