//! Draw synthetic responses from the noise model of a family, given
//! coefficients and a design matrix.

use crate::{
    design::Design,
    error::{RegressionError, RegressionResult},
    family::Family,
    fit::FitState,
    num::Float,
    response::Response,
};
use ndarray::{Array1, Array2, Axis};
use rand::{
    distributions::{Bernoulli, Distribution, WeightedIndex},
    Rng,
};
use rand_distr::{Normal, Poisson};

fn to_f64<F: Float>(v: F) -> RegressionResult<f64> {
    v.to_f64()
        .ok_or_else(|| RegressionError::Sampling(format!("{} is not representable", v)))
}

/// Sample one response per row of `x` from the family's distribution with
/// the mean implied by `state`. Single-output families give `Response::Values`,
/// the categorical family one-hot rows in `Response::OneHot`.
pub fn simulate<F, X, R>(
    family: Family,
    state: &FitState<F>,
    x: &X,
    rng: &mut R,
) -> RegressionResult<Response<F>>
where
    F: Float,
    X: Design<F>,
    R: Rng + ?Sized,
{
    let mu = state.predict(family, x)?;
    if family.is_categorical() {
        let mut draws = Array2::zeros(mu.raw_dim());
        for (probs, mut row) in mu.axis_iter(Axis(0)).zip(draws.axis_iter_mut(Axis(0))) {
            let weights = probs
                .iter()
                .map(|&p| to_f64(p))
                .collect::<RegressionResult<Vec<_>>>()?;
            let class = WeightedIndex::new(&weights)
                .map_err(|e| RegressionError::Sampling(e.to_string()))?
                .sample(rng);
            row[class] = F::one();
        }
        return Ok(Response::OneHot(draws));
    }

    let noise = Normal::new(0., 1.).map_err(|e| RegressionError::Sampling(e.to_string()))?;
    let draws = mu
        .column(0)
        .iter()
        .map(|&m| {
            let draw = draw_single(family, to_f64(m)?, &noise, rng)?;
            <F as num_traits::NumCast>::from(draw)
                .ok_or_else(|| RegressionError::Sampling(draw.to_string()))
        })
        .collect::<RegressionResult<Array1<F>>>()?;
    Ok(Response::Values(draws))
}

/// One draw from a single-output family with mean `mu`.
fn draw_single<R>(
    family: Family,
    mu: f64,
    noise: &Normal<f64>,
    rng: &mut R,
) -> RegressionResult<f64>
where
    R: Rng + ?Sized,
{
    let sampling = |e: &dyn std::fmt::Display| RegressionError::Sampling(e.to_string());
    match family {
        Family::Poisson | Family::PoissonSoftplus => {
            if mu > 0. {
                Ok(Poisson::new(mu).map_err(|e| sampling(&e))?.sample(rng))
            } else {
                Ok(0.)
            }
        }
        Family::Normal => Ok(mu + noise.sample(rng)),
        Family::Bernoulli => {
            let coin = Bernoulli::new(mu).map_err(|e| sampling(&e))?;
            Ok(if coin.sample(rng) { 1. } else { 0. })
        }
        Family::Categorical => Err(RegressionError::Sampling(
            "categorical responses are drawn as one-hot rows".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn poisson_draws_match_mean() -> RegressionResult<()> {
        let mut rng = StdRng::seed_from_u64(0);
        let x = Array2::<f64>::zeros((4000, 1));
        let state = FitState::single(f64::ln(3.), array![0.5]);
        let y = match simulate(Family::Poisson, &state, &x, &mut rng)? {
            Response::Values(y) => y,
            other => panic!("unexpected response {:?}", other),
        };
        assert_eq!(y.len(), 4000);
        assert!(y.iter().all(|&v| v >= 0. && v.fract() == 0.));
        assert_abs_diff_eq!(y.mean().unwrap(), 3.0, epsilon = 0.15);
        Ok(())
    }

    #[test]
    fn categorical_draws_are_one_hot() -> RegressionResult<()> {
        let mut rng = StdRng::seed_from_u64(1);
        let x = array![[-1., -2., -3.], [4., 5., 6.]];
        let state = FitState::new(array![0.1, -0.1], Array2::zeros((3, 2)))?;
        match simulate(Family::Categorical, &state, &x, &mut rng)? {
            Response::OneHot(y) => {
                assert_eq!(y.dim(), (2, 2));
                for row in y.rows() {
                    assert_abs_diff_eq!(row.sum(), 1.0);
                }
            }
            other => panic!("unexpected response {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn bernoulli_draws_are_binary() -> RegressionResult<()> {
        let mut rng = StdRng::seed_from_u64(2);
        let x = array![[-3.], [0.], [3.]];
        let state = FitState::single(0., array![1.]);
        let y = simulate(Family::Bernoulli, &state, &x, &mut rng)?;
        assert_eq!(y.len(), 3);
        if let Response::Values(y) = y {
            assert!(y.iter().all(|&v| v == 0. || v == 1.));
        }
        Ok(())
    }
}
