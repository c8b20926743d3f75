use thiserror::Error;

/// A result type for GP regression algorithm
pub type Result<T> = std::result::Result<T, GpError>;

/// An error when using [`GaussianProcess`](crate::GaussianProcess) or checking [`GpParams`](crate::GpParams)
#[derive(Error, Debug)]
pub enum GpError {
    /// When a parameter of the model is invalid (noise, kernel hyperparameters, tuning bounds...)
    #[error("InvalidConfig error: {0}")]
    InvalidConfigError(String),
    /// When given data does not match the model (shape mismatch, non finite values)
    #[error("InvalidValue error: {0}")]
    InvalidValueError(String),
    /// When the covariance matrix can not be factorized even after jitter retries
    #[error("Numerical error: {0}")]
    NumericalError(String),
    /// When linear algebra computation fails
    #[error(transparent)]
    LinalgError(#[from] linfa_linalg::LinalgError),
}
