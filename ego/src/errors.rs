use thiserror::Error;

/// A result type for Bayesian optimization errors
pub type Result<T> = std::result::Result<T, EgoError>;

/// An error for Bayesian optimization algorithm
#[derive(Error, Debug)]
pub enum EgoError {
    /// When bounds are malformed or mismatch the objective input dimension
    #[error("Invalid bounds: {0}")]
    InvalidBoundsError(String),
    /// When configuration is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfigError(String),
    /// When an invalid value is encountered
    #[error("Value error: {0}")]
    InvalidValueError(String),
    /// When the surrogate model fails
    #[error("GP error")]
    GpError(#[from] bayesopt_gp::GpError),
    /// When the objective function fails, the caller error is kept as is
    #[error(transparent)]
    ObjectiveEvaluationError(anyhow::Error),
    /// When IO fails
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    /// When numpy array write fails
    #[error("IO error")]
    WriteNpyError(#[from] ndarray_npy::WriteNpyError),
    /// When configuration serialization fails
    #[error("Save error: {0}")]
    JsonError(#[from] serde_json::Error),
}
