//! Inverse link functions mapping the linear predictor to the expectation of
//! the response, together with the derivatives needed by the solvers.

use crate::{
    math::{log1p_exp, sigmoid},
    num::Float,
};
use ndarray::{Array2, ArrayView2, Axis, Zip};

/// Above this linear predictor the exponential inverse link is continued
/// linearly, so that the mean and its derivative stay finite.
pub const EXP_THRESHOLD: f64 = 30.;
/// Above this linear predictor the softplus inverse link is continued linearly
/// with the slope it has at the threshold.
pub const SOFTPLUS_THRESHOLD: f64 = 30.;

/// The inverse link of a single-output family. The categorical family uses a
/// row-wise softmax instead, see [`softmax`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvLink {
    /// mu = exp(z), linearized above [`EXP_THRESHOLD`].
    Exp,
    /// mu = ln(1 + exp(z)), linearized above [`SOFTPLUS_THRESHOLD`].
    Softplus,
    /// mu = z
    Identity,
    /// mu = 1 / (1 + exp(-z))
    Logistic,
}

impl InvLink {
    /// Maps the linear predictor to the expectation value of the response.
    pub fn func_inv<F: Float>(self, z: F) -> F {
        match self {
            Self::Exp => {
                let thresh = F::lit(EXP_THRESHOLD);
                if z <= thresh {
                    z.exp()
                } else {
                    // exp(t) * (1 + z - t) matches value and slope at z = t
                    thresh.exp() * (F::one() + z - thresh)
                }
            }
            Self::Softplus => {
                let thresh = F::lit(SOFTPLUS_THRESHOLD);
                if z <= thresh {
                    log1p_exp(z)
                } else {
                    log1p_exp(thresh) + sigmoid(thresh) * (z - thresh)
                }
            }
            Self::Identity => z,
            Self::Logistic => sigmoid(z),
        }
    }

    /// The first derivative of the inverse link with respect to z.
    pub fn d_func_inv<F: Float>(self, z: F) -> F {
        match self {
            Self::Exp => z.min(F::lit(EXP_THRESHOLD)).exp(),
            Self::Softplus => sigmoid(z.min(F::lit(SOFTPLUS_THRESHOLD))),
            Self::Identity => F::one(),
            Self::Logistic => {
                let p = sigmoid(z);
                p * (F::one() - p)
            }
        }
    }

    /// The second derivative of the inverse link with respect to z. It
    /// vanishes on the linear extensions.
    pub fn d2_func_inv<F: Float>(self, z: F) -> F {
        match self {
            Self::Exp => {
                if z <= F::lit(EXP_THRESHOLD) {
                    z.exp()
                } else {
                    F::zero()
                }
            }
            Self::Softplus => {
                if z <= F::lit(SOFTPLUS_THRESHOLD) {
                    let s = sigmoid(z);
                    s * (F::one() - s)
                } else {
                    F::zero()
                }
            }
            Self::Identity => F::zero(),
            Self::Logistic => {
                let p = sigmoid(z);
                p * (F::one() - p) * (F::one() - p - p)
            }
        }
    }
}

/// Row-wise softmax of a samples x classes matrix of linear predictors. The
/// row maximum is subtracted before exponentiating.
pub fn softmax<F: Float>(z: ArrayView2<F>) -> Array2<F> {
    let mut probs = z.to_owned();
    for mut row in probs.axis_iter_mut(Axis(0)) {
        let max = row.fold(F::neg_infinity(), |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let total = row.sum();
        row.mapv_inplace(|v| v / total);
    }
    probs
}

/// Log of the row-wise softmax, computed with the log-sum-exp shift.
pub(crate) fn log_softmax<F: Float>(z: ArrayView2<F>) -> Array2<F> {
    let mut log_probs = z.to_owned();
    Zip::from(log_probs.rows_mut()).for_each(|mut row| {
        let max = row.fold(F::neg_infinity(), |m, &v| m.max(v));
        let log_total = row.fold(F::zero(), |acc, &v| acc + (v - max).exp()).ln() + max;
        row.mapv_inplace(|v| v - log_total);
    });
    log_probs
}
