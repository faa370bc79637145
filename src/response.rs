//! Response data and its conversion into the samples x classes matrix the
//! solvers work with.

use crate::{
    error::{RegressionError, RegressionResult},
    family::Family,
    num::Float,
    utility::one_hot,
};
use ndarray::{Array1, Array2, Axis};

/// Observed response data.
#[derive(Clone, Debug, PartialEq)]
pub enum Response<F> {
    /// One value per sample: real values, counts, 0/1 outcomes, or (for the
    /// categorical family) integer-valued class labels.
    Values(Array1<F>),
    /// Class labels, one per sample.
    Labels(Array1<usize>),
    /// Class membership, samples x classes. Rows are usually one-hot.
    OneHot(Array2<F>),
}

impl<F: Float> From<Array1<F>> for Response<F> {
    fn from(values: Array1<F>) -> Self {
        Self::Values(values)
    }
}

impl<F: Float> From<Array2<F>> for Response<F> {
    fn from(one_hot: Array2<F>) -> Self {
        Self::OneHot(one_hot)
    }
}

impl<F: Float> Response<F> {
    /// The number of samples.
    pub fn len(&self) -> usize {
        match self {
            Self::Values(v) => v.len(),
            Self::Labels(l) => l.len(),
            Self::OneHot(m) => m.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to the samples x classes matrix used by the family functions,
    /// checking that the values are in the domain of the family. Class labels
    /// are one-hot encoded; `n_classes` fixes the number of columns, otherwise
    /// it is one more than the largest label.
    pub fn to_matrix(
        &self,
        family: Family,
        n_classes: Option<usize>,
    ) -> RegressionResult<Array2<F>> {
        let y: Array2<F> = match (self, family.is_categorical()) {
            (Self::Labels(labels), true) => {
                let k = n_classes.unwrap_or_else(|| labels.iter().max().map_or(0, |&m| m + 1));
                one_hot(labels.view(), k)?
            }
            (Self::Values(values), true) => {
                let labels = values
                    .iter()
                    .map(|&v| {
                        if v >= F::zero() && v.fract() == F::zero() {
                            v.to_usize().ok_or_else(|| RegressionError::InvalidY(v.to_string()))
                        } else {
                            Err(RegressionError::InvalidY(format!(
                                "{} is not a class label",
                                v
                            )))
                        }
                    })
                    .collect::<RegressionResult<Array1<usize>>>()?;
                return Self::Labels(labels).to_matrix(family, n_classes);
            }
            (Self::OneHot(m), true) => {
                if let Some(k) = n_classes {
                    if k != m.ncols() {
                        return Err(RegressionError::BadInput(format!(
                            "expected {} classes, response has {}",
                            k,
                            m.ncols()
                        )));
                    }
                }
                m.to_owned()
            }
            (Self::Values(values), false) => values.clone().insert_axis(Axis(1)),
            (Self::Labels(labels), false) => labels.mapv(F::from_count).insert_axis(Axis(1)),
            (Self::OneHot(m), false) => {
                if m.ncols() != 1 {
                    return Err(RegressionError::BadInput(format!(
                        "the {} family takes a single response column, got {}",
                        family,
                        m.ncols()
                    )));
                }
                m.to_owned()
            }
        };
        check_domain(family, &y)?;
        Ok(y)
    }
}

/// Ensure that every observation is a valid outcome of the family.
fn check_domain<F: Float>(family: Family, y: &Array2<F>) -> RegressionResult<()> {
    let valid = |v: F| -> bool {
        v.is_finite()
            && match family {
                Family::Normal => true,
                Family::Poisson | Family::PoissonSoftplus => v >= F::zero(),
                Family::Bernoulli | Family::Categorical => v >= F::zero() && v <= F::one(),
            }
    };
    match y.iter().find(|&&v| !valid(v)) {
        Some(v) => Err(RegressionError::InvalidY(format!(
            "{} is outside the domain of the {} family",
            v, family
        ))),
        None => Ok(()),
    }
}
