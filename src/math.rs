//! Mathematical helper functions
use crate::num::Float;

/// x * log(y), which is defined as zero when x == 0 regardless of y. The
/// logarithm argument is floored at the smallest positive float so that a zero
/// prediction for a non-zero observation gives a large finite penalty.
pub fn xlogy<F: Float>(x: F, y: F) -> F {
    if x == F::zero() {
        return F::zero();
    }
    x * y.max(F::min_positive_value()).ln()
}

/// The soft-thresholding operator S(x, t) = sign(x) * max(|x| - t, 0), which is
/// the proximal operator of t * |x|.
pub fn soft_threshold<F: Float>(x: F, thresh: F) -> F {
    let shrunk = x.abs() - thresh;
    if shrunk > F::zero() {
        shrunk * x.signum()
    } else if shrunk.is_nan() {
        shrunk
    } else {
        F::zero()
    }
}

/// The logistic function 1 / (1 + exp(-x)).
pub fn sigmoid<F: Float>(x: F) -> F {
    if x >= F::zero() {
        (F::one() + (-x).exp()).recip()
    } else {
        // avoid overflow of exp(-x) for large negative x
        let e = x.exp();
        e / (F::one() + e)
    }
}

/// ln(1 + exp(x)), evaluated without overflow for large x.
pub fn log1p_exp<F: Float>(x: F) -> F {
    if x > F::zero() {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn soft_threshold_clamps() {
        assert_eq!(soft_threshold(0.3, 0.5), 0.);
        assert_eq!(soft_threshold(-0.3, 0.5), 0.);
        assert_abs_diff_eq!(soft_threshold(1.5, 0.5), 1.0);
        assert_abs_diff_eq!(soft_threshold(-1.5, 0.5), -1.0);
        assert!(soft_threshold(f64::NAN, 0.5).is_nan());
        assert!(soft_threshold(1.0, f64::NAN).is_nan());
    }

    #[test]
    fn stable_logistic() {
        assert_abs_diff_eq!(sigmoid(0.0_f64), 0.5);
        assert_abs_diff_eq!(sigmoid(-800.0_f64), 0.0);
        assert_abs_diff_eq!(sigmoid(800.0_f64), 1.0);
        assert_abs_diff_eq!(log1p_exp(800.0_f64), 800.0);
        assert_abs_diff_eq!(log1p_exp(0.0_f64), f64::ln(2.), epsilon = 1e-15);
        assert!(log1p_exp(-800.0_f64) >= 0.);
    }
}
