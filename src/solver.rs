//! Solvers for a single entry of the regularization path.

pub mod batch;
pub mod cdfast;

use crate::{
    design::Design,
    error::{RegressionError, RegressionResult},
    family::Family,
    fit::{options::FitOptions, FitState},
    num::Float,
    regularization::ElasticNet,
};
use ndarray::ArrayView2;
use std::{fmt, str::FromStr};

/// The numerical method used to minimize the penalized loss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Solver {
    /// Proximal gradient descent with a fixed learning rate
    BatchGradient,
    /// Newton coordinate descent over a shrinking active set
    CdFast,
}

impl Default for Solver {
    fn default() -> Self {
        Self::BatchGradient
    }
}

impl FromStr for Solver {
    type Err = RegressionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "batch-gradient" | "batch_gradient" => Ok(Self::BatchGradient),
            "cdfast" => Ok(Self::CdFast),
            _ => Err(RegressionError::UnknownName {
                kind: "solver",
                name: name.to_string(),
            }),
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BatchGradient => f.write_str("batch-gradient"),
            Self::CdFast => f.write_str("cdfast"),
        }
    }
}

/// Everything that defines the minimization for one penalty strength. The
/// response is already in samples x classes form and all shapes agree.
pub struct Problem<'a, F, X>
where
    F: Float,
    X: Design<F>,
{
    pub family: Family,
    pub x: &'a X,
    pub y: ArrayView2<'a, F>,
    pub penalty: &'a ElasticNet<F>,
    pub lambda: F,
    pub options: &'a FitOptions<F>,
}

impl<'a, F, X> Problem<'a, F, X>
where
    F: Float,
    X: Design<F>,
{
    /// The penalized objective at the given state.
    pub fn objective(&self, state: &FitState<F>) -> RegressionResult<F> {
        let z = state.linear_predictor(self.x)?;
        Ok(self.objective_at(state, z.view()))
    }

    /// The penalized objective given the state's linear predictor z.
    pub(crate) fn objective_at(&self, state: &FitState<F>, z: ArrayView2<F>) -> F {
        self.family.loss(self.y, z) + self.penalty.penalty(self.lambda, &state.beta)
    }
}

impl Solver {
    /// Minimize the problem starting from `init`. Running out of iterations is
    /// not an error; the returned state records whether the tolerance was met.
    pub fn solve<F, X>(
        self,
        problem: &Problem<F, X>,
        init: FitState<F>,
    ) -> RegressionResult<FitState<F>>
    where
        F: Float,
        X: Design<F>,
    {
        match self {
            Self::BatchGradient => batch::solve(problem, init),
            Self::CdFast => cdfast::solve(problem, init).map(|(state, _)| state),
        }
    }
}
