//! Newton coordinate descent with active-set shrinkage.
//!
//! Each sweep visits the intercept and then every active feature, replacing
//! the coefficient with the minimizer of a second-order expansion of the loss
//! plus the elastic-net penalty. The linear predictor is updated in place
//! after each coordinate instead of being recomputed from scratch. A feature
//! whose coefficients all land on zero leaves the active set and is not
//! visited again for this penalty strength.
use super::Problem;
use crate::{
    design::Design,
    error::{RegressionError, RegressionResult},
    fit::FitState,
    num::Float,
};
use ndarray::{Array1, Array2};

/// Perform one sweep over the intercept and the active features, updating the
/// coefficients, the linear predictor z (samples x classes) and the active
/// set. The active mask has one entry per feature; a feature is dropped once
/// its coefficient is zero for every class. Returns the largest absolute
/// change of any parameter in the sweep.
pub fn sweep<F, X>(
    problem: &Problem<F, X>,
    state: &mut FitState<F>,
    z: &mut Array2<F>,
    active: &mut Array1<bool>,
) -> RegressionResult<F>
where
    F: Float,
    X: Design<F>,
{
    let n_samples = problem.x.n_samples();
    let n_features = problem.x.n_features();
    if active.len() != n_features
        || state.n_features() != n_features
        || z.dim() != (n_samples, state.n_classes())
    {
        return Err(RegressionError::BadInput(format!(
            "active set of {}, coefficients {:?} and linear predictor {:?} disagree with X {:?}",
            active.len(),
            state.beta.dim(),
            z.dim(),
            (n_samples, n_features)
        )));
    }
    let n_classes = state.n_classes();
    let mut max_change = F::zero();

    // The intercept is unpenalized and always active.
    let ones = Array1::<F>::ones(n_samples);
    let derivs = problem
        .family
        .grad_hess_1d(ones.view(), problem.y, z.view())?;
    for k in 0..n_classes {
        let (grad, hess) = derivs.component(k);
        if hess <= F::epsilon() {
            continue;
        }
        let delta = -grad / hess;
        state.beta0[k] += delta;
        z.column_mut(k).mapv_inplace(|v| v + delta);
        max_change = max_change.max(delta.abs());
    }

    for j in 0..n_features {
        if !active[j] {
            continue;
        }
        // all classes of this feature are updated from the same predictor
        let derivs = problem
            .family
            .grad_hess_feature(problem.x, j, problem.y, z.view())?;
        for k in 0..n_classes {
            let (grad, hess) = derivs.component(k);
            if hess <= F::epsilon() {
                continue;
            }
            let old = state.beta[[j, k]];
            let new = problem
                .penalty
                .coordinate_update(old, grad, hess, problem.lambda);
            let delta = new - old;
            if delta != F::zero() {
                state.beta[[j, k]] = new;
                problem.x.scaled_add_column(j, delta, z.column_mut(k));
                max_change = max_change.max(delta.abs());
            }
        }
        if state.beta.row(j).iter().all(|&b| b == F::zero()) {
            active[j] = false;
        }
    }
    Ok(max_change)
}

/// Sweep until the largest parameter change in a sweep is below the tolerance
/// or the iteration budget is exhausted. Returns the coefficients together
/// with the matching linear predictor.
pub fn solve<F, X>(
    problem: &Problem<F, X>,
    init: FitState<F>,
) -> RegressionResult<(FitState<F>, Array2<F>)>
where
    F: Float,
    X: Design<F>,
{
    let mut state = init;
    let mut z = state.linear_predictor(problem.x)?;
    let mut active = Array1::from_elem(problem.x.n_features(), true);
    state.n_iter = 0;
    state.converged = false;
    while state.n_iter < problem.options.max_iter {
        let max_change = sweep(problem, &mut state, &mut z, &mut active)?;
        state.n_iter += 1;
        if max_change < problem.options.tol {
            state.converged = true;
            break;
        }
    }
    Ok((state, z))
}
