//! This library implements [Gaussian Process](https://en.wikipedia.org/wiki/Gaussian_process) regression
//! used as the probabilistic surrogate model of a Bayesian optimization.
//!
//! A GP is a distribution over functions specified by a prior mean and a covariance function
//! (aka kernel). Given noisy observations `(x_i, y_i)`, the posterior mean and variance at any
//! point are computed from the Cholesky factorization of the covariance matrix of the observations.
//!
//! GP methods are implemented by [GaussianProcess] parameterized by [GpParams] and one of
//! the [kernels] implementing the [Kernel] trait. Kernel hyperparameters are either
//! fixed or tuned by maximizing the log marginal likelihood (see [HyperTuning]).
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod algorithm;
mod errors;
pub mod kernels;
mod parameters;
mod utils;

mod optimization;

pub use algorithm::*;
pub use errors::*;
pub use kernels::{
    AbsoluteExponentialKernel, Kernel, Matern32Kernel, Matern52Kernel, RbfKernel,
    SquaredExponentialKernel,
};
pub use parameters::*;
