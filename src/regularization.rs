//! The elastic-net penalty and its effect on the gradient and on the solver
//! updates. The intercept is never penalized, so every function here acts on
//! the feature coefficients only.
use crate::{
    error::{RegressionError, RegressionResult},
    math::soft_threshold,
    num::Float,
};
use itertools::Itertools;
use ndarray::{Array1, Array2, Axis};

/// Penalizes the likelihood by lambda * [(1 - alpha) * |beta|_2^2 + alpha * |beta|_1].
///
/// With a grouping vector the L1 part is replaced by the group-lasso norm
/// sum_g sqrt(|g|) * |beta_g|_2, which shrinks whole groups to zero at once.
/// Features with group id 0 belong to no group and are shrunk elementwise.
#[derive(Clone, Debug)]
pub struct ElasticNet<F: Float> {
    /// Mixing weight between L1 (alpha = 1) and L2 (alpha = 0)
    alpha: F,
    /// Group id per feature
    groups: Option<Array1<usize>>,
    /// The feature indices of each non-zero group id
    members: Vec<Vec<usize>>,
}

impl<F: Float> ElasticNet<F> {
    pub fn new(alpha: F) -> RegressionResult<Self> {
        if !(alpha >= F::zero() && alpha <= F::one()) {
            return Err(RegressionError::BadInput(format!(
                "alpha must be in [0, 1], got {}",
                alpha
            )));
        }
        Ok(Self {
            alpha,
            groups: None,
            members: Vec::new(),
        })
    }

    /// Apply group-wise rather than elementwise L1 shrinkage.
    pub fn with_groups(mut self, groups: Array1<usize>) -> Self {
        self.members = groups
            .iter()
            .enumerate()
            .filter(|(_, &g)| g > 0)
            .map(|(i, &g)| (g, i))
            .into_group_map()
            .into_iter()
            .sorted()
            .map(|(_, idx)| idx)
            .collect();
        self.groups = Some(groups);
        self
    }

    pub fn alpha(&self) -> F {
        self.alpha
    }

    pub fn groups(&self) -> Option<&Array1<usize>> {
        self.groups.as_ref()
    }

    /// Whether feature j is shrunk on its own rather than as part of a group.
    fn ungrouped(&self, j: usize) -> bool {
        self.groups.as_ref().map_or(true, |g| g[j] == 0)
    }

    /// The value of the penalty for the coefficient matrix (features x classes).
    pub fn penalty(&self, lambda: F, beta: &Array2<F>) -> F {
        let l2 = beta.fold(F::zero(), |acc, &b| acc + b * b);
        let mut l1 = F::zero();
        for (j, row) in beta.axis_iter(Axis(0)).enumerate() {
            if self.ungrouped(j) {
                l1 += row.fold(F::zero(), |acc, &b| acc + b.abs());
            }
        }
        for idx in &self.members {
            let size_scale = F::from_count(idx.len()).sqrt();
            for col in beta.columns() {
                let norm = idx.iter().fold(F::zero(), |acc, &i| acc + col[i] * col[i]);
                l1 += size_scale * norm.sqrt();
            }
        }
        lambda * ((F::one() - self.alpha) * l2 + self.alpha * l1)
    }

    /// Adds the gradient of the smooth (L2) part, 2 * (1 - alpha) * lambda * beta.
    pub fn gradient(&self, grad: Array2<F>, lambda: F, beta: &Array2<F>) -> Array2<F> {
        let scale = F::lit(2.) * (F::one() - self.alpha) * lambda;
        grad + &(beta * scale)
    }

    /// The proximal operator of the L1 (or group) part with the given
    /// threshold, which for a gradient step is learning_rate * alpha * lambda.
    pub fn prox(&self, mut beta: Array2<F>, thresh: F) -> Array2<F> {
        for (j, mut row) in beta.axis_iter_mut(Axis(0)).enumerate() {
            if self.ungrouped(j) {
                row.mapv_inplace(|b| soft_threshold(b, thresh));
            }
        }
        for idx in &self.members {
            let group_thresh = thresh * F::from_count(idx.len()).sqrt();
            for mut col in beta.columns_mut() {
                let norm = idx
                    .iter()
                    .fold(F::zero(), |acc, &i| acc + col[i] * col[i])
                    .sqrt();
                let scale = if norm > group_thresh {
                    F::one() - group_thresh / norm
                } else {
                    F::zero()
                };
                for &i in idx {
                    col[i] *= scale;
                }
            }
        }
        beta
    }

    /// The closed-form minimizer of the one-coordinate quadratic approximation
    /// g * d + h/2 * d^2 plus the elastic-net penalty, where d is the change in
    /// the coefficient: S(b - g/h, alpha*lambda/h) / (1 + 2*(1-alpha)*lambda/h).
    pub fn coordinate_update(&self, beta: F, grad: F, hess: F, lambda: F) -> F {
        let newton = beta - grad / hess;
        let shrunk = soft_threshold(newton, self.alpha * lambda / hess);
        shrunk / (F::one() + F::lit(2.) * (F::one() - self.alpha) * lambda / hess)
    }
}
