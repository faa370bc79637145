//! utility functions for internal library use

use crate::{
    design::Design,
    error::{RegressionError, RegressionResult},
    num::Float,
};
use ndarray::{Array1, Array2, ArrayView1};

/// The linear predictor beta0 + X * beta with one column per class. The
/// dimensions must already be known to agree.
pub(crate) fn linear_predictor<F, X>(x: &X, beta0: &Array1<F>, beta: &Array2<F>) -> Array2<F>
where
    F: Float,
    X: Design<F>,
{
    x.mul_coef(beta) + beta0
}

/// One-hot encode class labels into a samples x classes matrix.
pub fn one_hot<F: Float>(
    labels: ArrayView1<usize>,
    n_classes: usize,
) -> RegressionResult<Array2<F>> {
    let mut encoded = Array2::zeros((labels.len(), n_classes));
    for (mut row, &label) in encoded.rows_mut().into_iter().zip(labels.iter()) {
        if label >= n_classes {
            return Err(RegressionError::InvalidY(format!(
                "class label {} with only {} classes",
                label, n_classes
            )));
        }
        row[label] = F::one();
    }
    Ok(encoded)
}
