//! Fitting simulated data with little regularization gives back the
//! coefficients the data was drawn from.

mod common;

use anyhow::Result;
use approx::assert_abs_diff_eq;
use common::{simulated, simulated_sparse, FAMILIES};
use ndarray::{Array1, Array2, Axis};
use ndarray_glmnet::{Family, FitState, ModelBuilder, Solver};

/// Softmax coefficients are only identified up to a shift shared by the
/// classes, so compare them after removing the mean over classes.
fn centered(state: &FitState<f64>) -> (Array1<f64>, Array2<f64>) {
    if state.n_classes() == 1 {
        return (state.beta0.clone(), state.beta.clone());
    }
    let k = state.n_classes() as f64;
    let beta0 = &state.beta0 - state.beta0.sum() / k;
    let row_means = state.beta.sum_axis(Axis(1)) / k;
    let beta = &state.beta - &row_means.insert_axis(Axis(1));
    (beta0, beta)
}

fn check_recovery(family: Family, solver: Solver, epsilon: f64) -> Result<()> {
    let (x, truth, y) = simulated(family, 2000, 0)?;
    let mut model = ModelBuilder::new(family)
        .reg_lambda(vec![0.1, 0.001])
        .solver(solver)
        .tol(1e-5)
        .max_iter(10_000)
        .build()?;
    model.fit(&x, &y)?;
    assert_eq!(model.fit_states().len(), 2);

    let fit = &model.fit_states()[1];
    let (beta0, beta) = centered(fit);
    let (true_beta0, true_beta) = centered(&truth);
    assert_abs_diff_eq!(beta0, true_beta0, epsilon = epsilon);
    assert_abs_diff_eq!(beta, true_beta, epsilon = epsilon);
    Ok(())
}

#[test]
fn recovery_batch_gradient() -> Result<()> {
    for &family in FAMILIES.iter() {
        check_recovery(family, Solver::BatchGradient, 0.3)?;
    }
    Ok(())
}

#[test]
fn recovery_cdfast() -> Result<()> {
    for &family in FAMILIES.iter() {
        check_recovery(family, Solver::CdFast, 0.3)?;
    }
    Ok(())
}

#[test]
fn solvers_agree() -> Result<()> {
    for &family in FAMILIES.iter() {
        let (x, _, y) = simulated(family, 500, 3)?;
        let fit = |solver| -> Result<Vec<FitState<f64>>> {
            let mut model = ModelBuilder::new(family)
                .reg_lambda(vec![0.05, 0.01])
                .solver(solver)
                .tol(1e-6)
                .max_iter(20_000)
                .build()?;
            model.fit(&x, &y)?;
            Ok(model.fit_states().to_vec())
        };
        let batch = fit(Solver::BatchGradient)?;
        let cd = fit(Solver::CdFast)?;
        assert_eq!(batch.len(), cd.len());
        // the L1 term weakly pins the shared shift of the softmax coefficients
        let epsilon = if family.is_categorical() { 0.1 } else { 0.05 };
        for (b, c) in batch.iter().zip(cd.iter()) {
            assert_eq!(b.beta0.dim(), c.beta0.dim());
            assert_eq!(b.beta.dim(), c.beta.dim());
            let (b0, bb) = centered(b);
            let (c0, cb) = centered(c);
            assert_abs_diff_eq!(b0, c0, epsilon = epsilon);
            assert_abs_diff_eq!(bb, cb, epsilon = epsilon);
        }
    }
    Ok(())
}

#[test]
fn warm_start_from_truth() -> Result<()> {
    let (x, truth, y) = simulated(Family::Poisson, 1000, 5)?;
    let mut model = ModelBuilder::new(Family::Poisson)
        .reg_lambda(vec![0.001])
        .solver(Solver::CdFast)
        .build()?;
    model.fit_warm(&x, &y, truth.clone())?;
    let fit = &model.fit_states()[0];
    assert!(fit.converged);
    assert_abs_diff_eq!(fit.beta, truth.beta, epsilon = 0.2);
    Ok(())
}

/// A hundred features with sparse coefficients, fit with the default path,
/// learning rate, tolerance and iteration budget.
fn check_wide_recovery(family: Family, solver: Solver) -> Result<()> {
    let (x, truth, y) = simulated_sparse(family, 1000, 100, 1)?;
    let mut model = ModelBuilder::new(family).solver(solver).build()?;
    model.fit(&x, &y)?;
    assert_eq!(model.fit_states().len(), 10);

    let fit = &model.fit_states()[9];
    assert!(fit.beta.iter().all(|b| b.is_finite()));
    let (beta0, beta) = centered(fit);
    let (true_beta0, true_beta) = centered(&truth);
    assert_abs_diff_eq!(beta0, true_beta0, epsilon = 0.5);
    assert_abs_diff_eq!(beta, true_beta, epsilon = 0.5);
    Ok(())
}

#[test]
fn wide_recovery_batch_gradient() -> Result<()> {
    for &family in FAMILIES.iter() {
        check_wide_recovery(family, Solver::BatchGradient)?;
    }
    Ok(())
}

#[test]
fn wide_recovery_cdfast() -> Result<()> {
    for &family in FAMILIES.iter() {
        check_wide_recovery(family, Solver::CdFast)?;
    }
    Ok(())
}

#[test]
fn exponential_poisson_path_stays_finite() -> Result<()> {
    let (x, _, y) = simulated_sparse(Family::Poisson, 1000, 100, 1)?;
    let mut model = ModelBuilder::new(Family::Poisson).build()?;
    model.fit(&x, &y)?;
    for state in model.fit_states() {
        assert!(state.beta0.iter().chain(state.beta.iter()).all(|b| b.is_finite()));
        assert!(state.n_iter <= 1000);
    }
    Ok(())
}
