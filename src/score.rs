//! Goodness-of-fit scores based on the log-likelihood.

use crate::{
    error::{RegressionError, RegressionResult},
    family::Family,
    num::Float,
};
use ndarray::{Array2, ArrayView2, Axis};
use std::str::FromStr;

/// How to score predictions against observations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreMethod {
    /// 2 * (log L(y | y) - log L(y | yhat))
    Deviance,
    /// 1 - D(y, yhat) / D(y, null)
    PseudoR2,
}

impl Default for ScoreMethod {
    fn default() -> Self {
        Self::PseudoR2
    }
}

impl FromStr for ScoreMethod {
    type Err = RegressionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "deviance" => Ok(Self::Deviance),
            "pseudo_R2" | "pseudo_r2" => Ok(Self::PseudoR2),
            _ => Err(RegressionError::UnknownName {
                kind: "scoring method",
                name: name.to_string(),
            }),
        }
    }
}

/// The deviance of the predicted means `yhat` given the observations `y`,
/// both samples x classes.
pub fn deviance<F: Float>(family: Family, y: ArrayView2<F>, yhat: ArrayView2<F>) -> F {
    let two = F::lit(2.);
    two * (family.log_likelihood(y, y) - family.log_likelihood(y, yhat))
}

/// The fraction of the null model's deviance explained by the prediction.
/// The ratio is undefined when the null prediction already fits exactly, as
/// for a constant response scored against its own mean.
pub fn pseudo_r2<F: Float>(
    family: Family,
    y: ArrayView2<F>,
    yhat: ArrayView2<F>,
    null: ArrayView2<F>,
) -> RegressionResult<F> {
    let null_dev = deviance(family, y, null);
    if !(null_dev > F::zero()) || !null_dev.is_finite() {
        return Err(RegressionError::BadInput(format!(
            "pseudo-R2 needs a positive finite null deviance, got {}",
            null_dev
        )));
    }
    Ok(F::one() - deviance(family, y, yhat) / null_dev)
}

/// The null prediction used when none is given: the sample mean of each
/// response column, repeated for every sample.
pub fn mean_prediction<F: Float>(y: ArrayView2<F>) -> Array2<F> {
    let n = F::from_count(y.nrows().max(1));
    let means = y.sum_axis(Axis(0)) / n;
    Array2::from_shape_fn(y.dim(), |(_, k)| means[k])
}

/// Score `yhat` against `y`. Deviance requires a null baseline to be given;
/// pseudo-R² falls back to the sample mean. All arrays must share a shape.
pub fn score<F: Float>(
    family: Family,
    y: ArrayView2<F>,
    yhat: ArrayView2<F>,
    null: Option<ArrayView2<F>>,
    method: ScoreMethod,
) -> RegressionResult<F> {
    if yhat.dim() != y.dim() {
        return Err(RegressionError::BadInput(format!(
            "prediction of shape {:?} for a response of shape {:?}",
            yhat.dim(),
            y.dim()
        )));
    }
    if let Some(null) = null {
        if null.dim() != yhat.dim() {
            return Err(RegressionError::BadInput(format!(
                "null prediction of shape {:?} for a prediction of shape {:?}",
                null.dim(),
                yhat.dim()
            )));
        }
    }
    match (method, null) {
        (ScoreMethod::Deviance, Some(_)) => Ok(deviance(family, y, yhat)),
        (ScoreMethod::Deviance, None) => Err(RegressionError::BadInput(
            "deviance scoring requires a null prediction".to_string(),
        )),
        (ScoreMethod::PseudoR2, Some(null)) => pseudo_r2(family, y, yhat, null),
        (ScoreMethod::PseudoR2, None) => {
            let null = mean_prediction(y);
            pseudo_r2(family, y, yhat, null.view())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn normal_deviance_is_sum_of_squares() {
        let y = array![[1.0], [2.0], [4.0]];
        let yhat = array![[1.5], [2.0], [3.0]];
        assert_abs_diff_eq!(deviance(Family::Normal, y.view(), yhat.view()), 1.25);
    }

    #[test]
    fn pseudo_r2_of_perfect_and_null_predictions() -> RegressionResult<()> {
        let y = array![[0.], [1.], [3.], [2.]];
        let null = mean_prediction(y.view());
        assert_abs_diff_eq!(null, array![[1.5], [1.5], [1.5], [1.5]]);
        let perfect = score(Family::Poisson, y.view(), y.view(), None, ScoreMethod::PseudoR2)?;
        assert_abs_diff_eq!(perfect, 1.0);
        let none = score(
            Family::Poisson,
            y.view(),
            null.view(),
            Some(null.view()),
            ScoreMethod::PseudoR2,
        )?;
        assert_abs_diff_eq!(none, 0.0);
        Ok(())
    }

    #[test]
    fn scoring_errors() {
        let y = array![[0.], [1.]];
        assert!(matches!(
            score(Family::Bernoulli, y.view(), y.view(), None, ScoreMethod::Deviance),
            Err(RegressionError::BadInput(_))
        ));
        let wide = array![[0.5, 0.5], [0.5, 0.5]];
        assert!(
            score(Family::Bernoulli, y.view(), wide.view(), None, ScoreMethod::PseudoR2).is_err()
        );
        assert!(score(
            Family::Bernoulli,
            y.view(),
            y.view(),
            Some(wide.view()),
            ScoreMethod::PseudoR2
        )
        .is_err());
        assert!(matches!(
            "r2".parse::<ScoreMethod>(),
            Err(RegressionError::UnknownName { .. })
        ));
        assert_eq!("pseudo_R2".parse::<ScoreMethod>().unwrap(), ScoreMethod::PseudoR2);
    }

    #[test]
    fn constant_response_has_no_pseudo_r2() {
        let y = array![[2.], [2.], [2.]];
        let yhat = array![[1.5], [2.5], [2.]];
        for &family in [Family::Normal, Family::Poisson].iter() {
            assert!(matches!(
                score(family, y.view(), yhat.view(), None, ScoreMethod::PseudoR2),
                Err(RegressionError::BadInput(_))
            ));
        }
        let ones = array![[1.], [1.]];
        let half = array![[0.5], [0.5]];
        assert!(pseudo_r2(Family::Bernoulli, ones.view(), half.view(), ones.view()).is_err());
    }
}
