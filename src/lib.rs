//! Bayesian optimization toolbox.
//!
//! This crate gathers the members of the workspace:
//! * [doe]: sampling methods (Latin hypercube, random) used to draw designs of experiments,
//! * [gp]: Gaussian process regression used as a surrogate model,
//! * [ego]: the Bayesian optimization loop driven by acquisition strategies.
//!
//! # Example
//!
//! ```no_run
//! use bayesopt::ego::{BayesianOptimization, LowerConfidenceBound};
//! use bayesopt::gp::{GaussianProcess, RbfKernel};
//! use linfa::ParamGuard;
//! use ndarray::{array, ArrayView1};
//!
//! fn rosenbrock(x: &ArrayView1<f64>) -> anyhow::Result<f64> {
//!     Ok((1. - x[0]).powi(2) + 100. * (x[1] - x[0] * x[0]).powi(2))
//! }
//!
//! let gp = GaussianProcess::new(
//!     GaussianProcess::params(RbfKernel::default())
//!         .noise_variance(1e-5)
//!         .check()
//!         .expect("GP parameters"),
//! );
//! let mut optimizer = BayesianOptimization::builder(gp, LowerConfidenceBound::default())
//!     .configure(|config| config.initial_samples(20).total_budget(100))
//!     .min_within(&array![[-2., 2.], [-2., 2.]])
//!     .expect("optimizer configured");
//! let x_opt = optimizer.optimize(rosenbrock, true).expect("rosenbrock minimized");
//! println!("Ans: {x_opt}");
//! ```
pub use bayesopt_doe as doe;
pub use bayesopt_ego as ego;
pub use bayesopt_gp as gp;
