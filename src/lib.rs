//! Elastic-net regularized generalized linear models.
//!
//! A [`Model`] is configured with a [`ModelBuilder`] and fit to a design
//! matrix (dense, or sparse through [`Design`]) and a [`Response`] for every
//! penalty strength of a regularization path, each fit warm-started from the
//! previous solution. The Poisson (with exponential or softplus link), normal,
//! Bernoulli and categorical families are supported, solved either by batch
//! proximal gradient descent or by Newton coordinate descent.
//!
//! ```
//! use ndarray::array;
//! use ndarray_glmnet::{Family, ModelBuilder, Response, Solver};
//!
//! let x = array![[0.3, -1.2], [1.1, 0.4], [-0.8, 0.9], [0.2, 0.1]];
//! let y = Response::Values(array![1.2, 0.7, -0.4, 0.5]);
//! let mut model = ModelBuilder::new(Family::Normal)
//!     .reg_lambda(vec![0.1, 0.01])
//!     .solver(Solver::CdFast)
//!     .build()?;
//! let yhat = model.fit_predict(&x, &y)?;
//! assert_eq!(yhat.shape(), &[2, 4]);
//! # Ok::<(), ndarray_glmnet::RegressionError>(())
//! ```

pub mod design;
pub mod error;
pub mod family;
pub mod fit;
pub mod index;
pub mod link;
mod math;
pub mod model;
pub mod num;
pub mod path;
pub mod regularization;
pub mod response;
pub mod score;
pub mod simulate;
pub mod solver;
mod utility;

pub use design::Design;
pub use error::{RegressionError, RegressionResult};
pub use family::Family;
pub use fit::{options::FitOptions, FitState};
pub use index::PathIndex;
pub use model::{Model, ModelBuilder};
pub use regularization::ElasticNet;
pub use response::Response;
pub use score::ScoreMethod;
pub use solver::Solver;
pub use utility::one_hot;
