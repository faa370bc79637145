//! define the error enum for the result of regressions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegressionError {
    #[error("Inconsistent input: {0}")]
    BadInput(String),
    #[error("Invalid response data: {0}")]
    InvalidY(String),
    #[error("Unknown {kind} name: {name}")]
    UnknownName { kind: &'static str, name: String },
    #[error("Model has not been fit")]
    NotFit,
    #[error("Invalid path index: {0}")]
    Index(String),
    #[error("Sampling failed: {0}")]
    Sampling(String),
}

pub type RegressionResult<T> = Result<T, RegressionError>;
