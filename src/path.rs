//! Fitting along the regularization path.
//!
//! The penalty strengths are visited in the order given. Each solution is the
//! starting point of the next fit (a warm start), which speeds up convergence
//! and keeps the path continuous.

use crate::{
    design::Design,
    error::{RegressionError, RegressionResult},
    family::Family,
    fit::{options::FitOptions, FitState},
    num::Float,
    regularization::ElasticNet,
    response::Response,
    solver::{Problem, Solver},
};
use ndarray::{Array2, ArrayView1};

/// Check the penalty strengths: at least one, all finite and non-negative.
pub(crate) fn validate_lambdas<F: Float>(reg_lambda: ArrayView1<F>) -> RegressionResult<()> {
    if reg_lambda.is_empty() {
        return Err(RegressionError::BadInput(
            "the regularization path is empty".to_string(),
        ));
    }
    if let Some(bad) = reg_lambda
        .iter()
        .find(|&&l| !(l >= F::zero() && l.is_finite()))
    {
        return Err(RegressionError::BadInput(format!(
            "penalty strengths must be non-negative, got {}",
            bad
        )));
    }
    Ok(())
}

/// Fit one set of coefficients per penalty strength. The first fit starts from
/// `init` if given, otherwise from zero. All inputs are validated before any
/// solver runs.
#[allow(clippy::too_many_arguments)]
pub fn fit_path<F, X>(
    family: Family,
    solver: Solver,
    penalty: &ElasticNet<F>,
    reg_lambda: ArrayView1<F>,
    options: &FitOptions<F>,
    x: &X,
    y: &Response<F>,
    init: Option<FitState<F>>,
) -> RegressionResult<Vec<FitState<F>>>
where
    F: Float,
    X: Design<F>,
{
    validate_lambdas(reg_lambda)?;
    options.validate()?;
    let n_samples = x.n_samples();
    let n_features = x.n_features();
    if y.len() != n_samples {
        return Err(RegressionError::BadInput(format!(
            "y has {} samples but X has {}",
            y.len(),
            n_samples
        )));
    }
    if n_samples == 0 {
        return Err(RegressionError::BadInput("no samples to fit".to_string()));
    }
    if let Some(groups) = penalty.groups() {
        if groups.len() != n_features {
            return Err(RegressionError::BadInput(format!(
                "{} group ids given for {} features",
                groups.len(),
                n_features
            )));
        }
    }
    if !x.all_finite() {
        return Err(RegressionError::BadInput(
            "X contains non-finite values".to_string(),
        ));
    }

    let n_classes = match (&init, family.is_categorical()) {
        (Some(init), true) => Some(init.n_classes()),
        _ => None,
    };
    let y: Array2<F> = y.to_matrix(family, n_classes)?;
    let mut guess = match init {
        Some(init) => {
            if init.n_features() != n_features || init.n_classes() != y.ncols() {
                return Err(RegressionError::BadInput(format!(
                    "warm start of shape {:?} does not match {} features and {} classes",
                    init.beta.dim(),
                    n_features,
                    y.ncols()
                )));
            }
            init
        }
        None => FitState::zeros(n_features, y.ncols()),
    };

    let mut path = Vec::with_capacity(reg_lambda.len());
    for (i_lambda, &lambda) in reg_lambda.iter().enumerate() {
        let problem = Problem {
            family,
            x,
            y: y.view(),
            penalty,
            lambda,
            options,
        };
        let fit = solver.solve(&problem, guess)?;
        let objective = problem.objective(&fit)?;
        log::debug!(
            "{} path entry {} (lambda = {}): {} iterations, objective {}, converged: {}",
            solver,
            i_lambda,
            lambda,
            fit.n_iter,
            objective,
            fit.converged
        );
        if !objective.is_finite() {
            log::warn!(
                "non-finite objective at lambda = {} with the {} family",
                lambda,
                family
            );
        } else if !fit.converged {
            log::warn!(
                "{} did not reach tolerance {} within {} iterations at lambda = {}",
                solver,
                options.tol,
                options.max_iter,
                lambda
            );
        }
        guess = fit.clone();
        path.push(fit);
    }
    Ok(path)
}
