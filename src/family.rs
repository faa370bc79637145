//! The exponential-family distributions supported by the fitting engine.
//!
//! Every quantity is expressed in terms of a samples x classes matrix. The
//! single-output families use a single column, the categorical family one
//! column per class. The loss is the negative log-likelihood averaged over
//! samples, so the gradients and Hessians below are sample means as well.

use crate::{
    design::Design,
    error::{RegressionError, RegressionResult},
    fit::FitState,
    link::{log_softmax, softmax, InvLink},
    math::{log1p_exp, xlogy},
    num::Float,
    regularization::ElasticNet,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use std::{fmt, str::FromStr};

/// The distribution of the response given the linear predictor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    /// Counts with mean exp(z)
    Poisson,
    /// Counts with mean ln(1 + exp(z))
    PoissonSoftplus,
    /// Real values with mean z and unit variance
    Normal,
    /// Binary outcomes with probability 1 / (1 + exp(-z))
    Bernoulli,
    /// One of K classes with probabilities softmax(z)
    Categorical,
}

impl FromStr for Family {
    type Err = RegressionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "poisson" | "poissonexp" => Ok(Self::Poisson),
            "softplus" | "poisson-softplus" | "poisson_softplus" => Ok(Self::PoissonSoftplus),
            "normal" | "gaussian" => Ok(Self::Normal),
            "binomial" | "bernoulli" => Ok(Self::Bernoulli),
            "multinomial" | "categorical" => Ok(Self::Categorical),
            _ => Err(RegressionError::UnknownName {
                kind: "distribution",
                name: name.to_string(),
            }),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Poisson => "poisson",
            Self::PoissonSoftplus => "softplus",
            Self::Normal => "normal",
            Self::Bernoulli => "binomial",
            Self::Categorical => "multinomial",
        };
        f.write_str(name)
    }
}

/// First and second derivative of the loss with respect to a single
/// coefficient, holding all others fixed.
#[derive(Clone, Debug, PartialEq)]
pub enum GradHess<F> {
    /// A single-output family has one coefficient per feature.
    Scalar { grad: F, hess: F },
    /// The categorical family has one coefficient per feature and class.
    Classes { grad: Array1<F>, hess: Array1<F> },
}

impl<F: Float> GradHess<F> {
    /// The (gradient, Hessian) pair of class k. A scalar pair is class 0.
    pub fn component(&self, k: usize) -> (F, F) {
        match self {
            Self::Scalar { grad, hess } => (*grad, *hess),
            Self::Classes { grad, hess } => (grad[k], hess[k]),
        }
    }
}

impl Family {
    pub fn is_categorical(self) -> bool {
        self == Self::Categorical
    }

    /// The inverse link of a single-output family.
    pub fn inv_link(self) -> Option<InvLink> {
        match self {
            Self::Poisson => Some(InvLink::Exp),
            Self::PoissonSoftplus => Some(InvLink::Softplus),
            Self::Normal => Some(InvLink::Identity),
            Self::Bernoulli => Some(InvLink::Logistic),
            Self::Categorical => None,
        }
    }

    /// The expected response for each sample and class given the linear
    /// predictor.
    pub fn mean<F: Float>(self, z: ArrayView2<F>) -> Array2<F> {
        match self.inv_link() {
            Some(link) => z.mapv(|v| link.func_inv(v)),
            None => softmax(z),
        }
    }

    /// The negative log-likelihood of each sample, dropping terms that depend
    /// only on y.
    pub fn neg_log_like<F: Float>(self, y: ArrayView2<F>, z: ArrayView2<F>) -> Array1<F> {
        let half = F::lit(0.5);
        let terms: Array2<F> = match self {
            Self::Normal => Zip::from(&y).and(&z).map_collect(|&y, &z| half * (y - z) * (y - z)),
            Self::Poisson | Self::PoissonSoftplus => {
                let mu = self.mean(z);
                Zip::from(&y).and(&mu).map_collect(|&y, &mu| mu - xlogy(y, mu))
            }
            Self::Bernoulli => Zip::from(&y).and(&z).map_collect(|&y, &z| log1p_exp(z) - y * z),
            Self::Categorical => -(&y * &log_softmax(z)),
        };
        terms.sum_axis(Axis(1))
    }

    /// The loss minimized by the solvers (without the penalty): the mean
    /// negative log-likelihood.
    pub fn loss<F: Float>(self, y: ArrayView2<F>, z: ArrayView2<F>) -> F {
        let nll = self.neg_log_like(y, z);
        nll.sum() / F::from_count(nll.len().max(1))
    }

    /// The first and second derivatives of each sample's loss with respect to
    /// its linear predictor(s). For the categorical family the second
    /// derivative is the diagonal of the per-sample Hessian.
    fn loss_derivs<F: Float>(self, y: ArrayView2<F>, z: ArrayView2<F>) -> (Array2<F>, Array2<F>) {
        match self {
            Self::Normal => ((&z - &y), Array2::ones(z.raw_dim())),
            Self::Bernoulli | Self::Categorical => {
                let mu = self.mean(z);
                let d2 = mu.mapv(|p| p * (F::one() - p));
                (mu - &y, d2)
            }
            Self::Poisson | Self::PoissonSoftplus => {
                let link = if self == Self::Poisson {
                    InvLink::Exp
                } else {
                    InvLink::Softplus
                };
                let mut d1 = Array2::zeros(z.raw_dim());
                let mut d2 = Array2::zeros(z.raw_dim());
                Zip::from(&mut d1)
                    .and(&mut d2)
                    .and(&y)
                    .and(&z)
                    .for_each(|d1, d2, &y, &z| {
                        let mu = link.func_inv(z).max(F::min_positive_value());
                        let dmu = link.d_func_inv(z);
                        let d2mu = link.d2_func_inv(z);
                        let ratio = y / mu;
                        // loss = mu - y ln(mu)
                        *d1 = dmu * (F::one() - ratio);
                        *d2 = d2mu * (F::one() - ratio) + ratio * dmu * dmu / mu;
                    });
                (d1, d2)
            }
        }
    }

    /// The gradient of the loss with respect to the intercepts (length K) and
    /// the coefficients (features x classes), given the linear predictor z.
    pub fn gradient<F, X>(
        self,
        x: &X,
        y: ArrayView2<F>,
        z: ArrayView2<F>,
    ) -> RegressionResult<(Array1<F>, Array2<F>)>
    where
        F: Float,
        X: Design<F>,
    {
        check_shapes(x.n_samples(), y, z)?;
        let n = F::from_count(x.n_samples().max(1));
        let (d1, _) = self.loss_derivs(y, z);
        let grad_beta0 = d1.sum_axis(Axis(0)) / n;
        let grad_beta = x.t_mul(d1.view()) / n;
        Ok((grad_beta0, grad_beta))
    }

    /// The gradient of the loss plus the smooth part of the penalty,
    /// 2 * (1 - alpha) * lambda * beta, at the given state.
    pub fn penalized_gradient<F, X>(
        self,
        x: &X,
        y: ArrayView2<F>,
        state: &FitState<F>,
        penalty: &ElasticNet<F>,
        lambda: F,
    ) -> RegressionResult<(Array1<F>, Array2<F>)>
    where
        F: Float,
        X: Design<F>,
    {
        let z = state.linear_predictor(x)?;
        let (grad_beta0, grad_beta) = self.gradient(x, y, z.view())?;
        Ok((grad_beta0, penalty.gradient(grad_beta, lambda, &state.beta)))
    }

    /// The derivatives of the loss with respect to the coefficient(s) of one
    /// feature with values `x_col`, holding everything else fixed. A column of
    /// ones gives the derivatives for the intercept.
    pub fn grad_hess_1d<F: Float>(
        self,
        x_col: ArrayView1<F>,
        y: ArrayView2<F>,
        z: ArrayView2<F>,
    ) -> RegressionResult<GradHess<F>> {
        check_shapes(x_col.len(), y, z)?;
        let n = F::from_count(x_col.len().max(1));
        let (d1, d2) = self.loss_derivs(y, z);
        let grad = d1.t().dot(&x_col) / n;
        let hess = d2.t().dot(&x_col.mapv(|v| v * v)) / n;
        Ok(self.grad_hess(grad, hess))
    }

    /// The same derivatives as [`Family::grad_hess_1d`] for feature `j` of a
    /// design matrix, without materializing the column.
    pub fn grad_hess_feature<F, X>(
        self,
        x: &X,
        j: usize,
        y: ArrayView2<F>,
        z: ArrayView2<F>,
    ) -> RegressionResult<GradHess<F>>
    where
        F: Float,
        X: Design<F>,
    {
        check_shapes(x.n_samples(), y, z)?;
        let n = F::from_count(x.n_samples().max(1));
        let (d1, d2) = self.loss_derivs(y, z);
        let (grad, hess) = x.column_moments(j, d1.view(), d2.view());
        Ok(self.grad_hess(grad / n, hess / n))
    }

    fn grad_hess<F: Float>(self, grad: Array1<F>, hess: Array1<F>) -> GradHess<F> {
        if self.is_categorical() {
            GradHess::Classes { grad, hess }
        } else {
            GradHess::Scalar {
                grad: grad[0],
                hess: hess[0],
            }
        }
    }

    /// The log-likelihood of the observations y given the predicted means,
    /// up to terms that depend only on y. Predicted probabilities are kept
    /// away from zero so that the result stays finite.
    pub fn log_likelihood<F: Float>(self, y: ArrayView2<F>, mu: ArrayView2<F>) -> F {
        let half = F::lit(0.5);
        let mut total = F::zero();
        match self {
            Self::Normal => Zip::from(&y)
                .and(&mu)
                .for_each(|&y, &mu| total -= half * (y - mu) * (y - mu)),
            Self::Poisson | Self::PoissonSoftplus => Zip::from(&y)
                .and(&mu)
                .for_each(|&y, &mu| total += xlogy(y, mu) - mu),
            Self::Bernoulli => Zip::from(&y).and(&mu).for_each(|&y, &mu| {
                total += xlogy(y, mu) + xlogy(F::one() - y, F::one() - mu)
            }),
            Self::Categorical => Zip::from(&y)
                .and(&mu)
                .for_each(|&y, &mu| total += xlogy(y, mu)),
        }
        total
    }
}

fn check_shapes<F: Float>(
    n_samples: usize,
    y: ArrayView2<F>,
    z: ArrayView2<F>,
) -> RegressionResult<()> {
    if y.dim() != z.dim() || y.nrows() != n_samples {
        return Err(RegressionError::BadInput(format!(
            "response {:?}, linear predictor {:?} and {} feature samples disagree",
            y.dim(),
            z.dim(),
            n_samples
        )));
    }
    Ok(())
}
