//! Synthetic data shared by the integration tests
#![allow(dead_code)]

use anyhow::Result;
use ndarray::{array, Array1, Array2};
use ndarray_glmnet::{simulate::simulate, Family, FitState, Response};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

pub const FAMILIES: [Family; 5] = [
    Family::Poisson,
    Family::PoissonSoftplus,
    Family::Normal,
    Family::Bernoulli,
    Family::Categorical,
];

/// The coefficients data is generated from. There are four features, and the
/// third has no effect in every family. The categorical coefficients sum to
/// zero over the classes.
pub fn true_state(family: Family) -> FitState<f64> {
    match family {
        Family::Poisson => FitState::single(0.5, array![0.3, -0.2, 0., 0.25]),
        Family::PoissonSoftplus => FitState::single(1.0, array![0.5, -0.4, 0., 0.3]),
        Family::Normal => FitState::single(0.5, array![1.0, -0.5, 0., 0.75]),
        Family::Bernoulli => FitState::single(0.3, array![1.0, -0.8, 0., 0.5]),
        Family::Categorical => FitState {
            beta0: array![0.2, -0.1, -0.1],
            beta: array![
                [1.0, -1.0, 0.],
                [0.5, 0., -0.5],
                [0., 0., 0.],
                [-0.5, 1.0, -0.5]
            ],
            n_iter: 0,
            converged: false,
        },
    }
}

/// A standard normal design matrix.
pub fn design(n_samples: usize, n_features: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_simple_fn((n_samples, n_features), || {
        StandardNormal.sample(&mut rng)
    })
}

/// A design matrix, the true coefficients, and a response drawn from the
/// family's noise model.
pub fn simulated(
    family: Family,
    n_samples: usize,
    seed: u64,
) -> Result<(Array2<f64>, FitState<f64>, Response<f64>)> {
    let truth = true_state(family);
    let x = design(n_samples, truth.n_features(), seed);
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let y = simulate(family, &truth, &x, &mut rng)?;
    Ok((x, truth, y))
}

/// Coefficients for a wide problem: an intercept and about a tenth of the
/// coefficients drawn from U(0, 1), the rest zero. The categorical family has
/// three classes.
pub fn sparse_state(family: Family, n_features: usize, seed: u64) -> FitState<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let n_classes = if family.is_categorical() { 3 } else { 1 };
    let beta0 = Array1::from_shape_simple_fn(n_classes, || rng.gen::<f64>());
    let beta = Array2::from_shape_simple_fn((n_features, n_classes), || {
        if rng.gen_bool(0.1) {
            rng.gen::<f64>()
        } else {
            0.
        }
    });
    FitState {
        beta0,
        beta,
        n_iter: 0,
        converged: false,
    }
}

/// Like [`simulated`], with `n_features` features and sparse coefficients.
pub fn simulated_sparse(
    family: Family,
    n_samples: usize,
    n_features: usize,
    seed: u64,
) -> Result<(Array2<f64>, FitState<f64>, Response<f64>)> {
    let truth = sparse_state(family, n_features, seed);
    let x = design(n_samples, n_features, seed.wrapping_add(1));
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(2));
    let y = simulate(family, &truth, &x, &mut rng)?;
    Ok((x, truth, y))
}
