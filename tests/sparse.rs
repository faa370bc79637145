//! Fitting a sparse design matrix gives the same path as the dense one.

mod common;

use anyhow::Result;
use approx::assert_abs_diff_eq;
use common::{design, true_state, FAMILIES};
use ndarray::Array2;
use ndarray_glmnet::{simulate::simulate, Family, ModelBuilder, Response, Solver};
use rand::{rngs::StdRng, SeedableRng};
use sprs::{CsMat, TriMat};

/// A standard normal design with the entries of magnitude below 0.8 dropped,
/// leaving roughly half of them zero.
fn sparse_data(family: Family, seed: u64) -> Result<(Array2<f64>, CsMat<f64>, Response<f64>)> {
    let truth = true_state(family);
    let dense = design(400, truth.n_features(), seed)
        .mapv(|v| if v.abs() < 0.8 { 0. } else { v });
    let mut tri = TriMat::new(dense.dim());
    for ((i, j), &v) in dense.indexed_iter() {
        if v != 0. {
            tri.add_triplet(i, j, v);
        }
    }
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let y = simulate(family, &truth, &dense, &mut rng)?;
    Ok((dense, tri.to_csc(), y))
}

#[test]
fn sparse_fit_matches_dense() -> Result<()> {
    for &solver in [Solver::CdFast, Solver::BatchGradient].iter() {
        for &family in FAMILIES.iter() {
            let (dense, sparse, y) = sparse_data(family, 50)?;
            let build = || {
                ModelBuilder::new(family)
                    .reg_lambda(vec![0.1, 0.01])
                    .solver(solver)
                    .tol(1e-8)
                    .max_iter(20_000)
                    .build()
            };
            let mut dense_model = build()?;
            dense_model.fit(&dense, &y)?;
            let mut sparse_model = build()?;
            sparse_model.fit(&sparse, &y)?;

            for (d, s) in dense_model
                .fit_states()
                .iter()
                .zip(sparse_model.fit_states())
            {
                assert_abs_diff_eq!(d.beta0, s.beta0, epsilon = 1e-5);
                assert_abs_diff_eq!(d.beta, s.beta, epsilon = 1e-5);
            }
            assert_abs_diff_eq!(
                dense_model.predict(&dense)?,
                sparse_model.predict(&sparse)?,
                epsilon = 1e-4
            );
        }
    }
    Ok(())
}

#[test]
fn row_major_storage_predicts_the_same() -> Result<()> {
    let (dense, sparse, y) = sparse_data(Family::Bernoulli, 51)?;
    let mut model = ModelBuilder::new(Family::Bernoulli)
        .reg_lambda(vec![0.05])
        .solver(Solver::CdFast)
        .build()?;
    model.fit(&sparse.to_csr(), &y)?;
    assert_abs_diff_eq!(model.predict(&dense)?, model.predict(&sparse)?, epsilon = 1e-12);
    Ok(())
}
