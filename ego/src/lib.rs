//! This library implements Bayesian optimization of expensive black-box functions
//! within box bounds.
//!
//! A [Gaussian process](bayesopt_gp) surrogate is trained on the objective evaluations,
//! then the next point to evaluate is the optimum of an acquisition strategy
//! trading off exploitation of the surrogate mean and exploration of its uncertainty:
//! * [LowerConfidenceBound] `mean(x) - kappa * sigma(x)` (minimized),
//! * [ExpectedImprovement] (maximized).
//!
//! The optimizer comes with a set of options (see [BoConfig]) to:
//! * specify the evaluation budget and the number of initial samples,
//! * choose the initial sampling method,
//! * parameterize the acquisition optimization,
//! * seed the random generator for reproducible runs,
//! * save the optimization history.
//!
//! # Example
//!
//! ```
//! use bayesopt_ego::{BayesianOptimization, LowerConfidenceBound};
//! use bayesopt_gp::{GaussianProcess, HyperTuning, RbfKernel};
//! use linfa::ParamGuard;
//! use ndarray::{array, ArrayView1};
//!
//! // A one-dimensional test function, x in [0., 25.] and min xsinx(x) ~ -15.1 at x ~ 18.9
//! fn xsinx(x: &ArrayView1<f64>) -> anyhow::Result<f64> {
//!     Ok((x[0] - 3.5) * ((x[0] - 3.5) / std::f64::consts::PI).sin())
//! }
//!
//! let gp = GaussianProcess::new(
//!     GaussianProcess::params(RbfKernel::default())
//!         .normalize_output(true)
//!         .hyper_tuning(HyperTuning::optimized())
//!         .check()
//!         .expect("GP parameters"),
//! );
//!
//! // We ask for 15 evaluations of the objective function to get the result
//! let mut optimizer = BayesianOptimization::builder(gp, LowerConfidenceBound::default())
//!     .configure(|config| config.total_budget(15).initial_samples(5).seed(42))
//!     .min_within(&array![[0.0, 25.0]])
//!     .expect("optimizer configured");
//! let x_opt = optimizer.optimize(xsinx, false).expect("xsinx minimized");
//! let res = optimizer.result().expect("result available");
//! println!("Minimum found f(x) = {:?} at x = {:?}", res.y_opt, x_opt);
//! ```
//!
//! An objective failure stops the optimization: the caller error is returned
//! unchanged wrapped in [EgoError::ObjectiveEvaluationError] and the best point
//! found so far remains available with [BayesianOptimization::best].
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
pub mod criteria;
mod errors;
mod optimizers;
mod solver;
mod types;
pub mod utils;

pub use crate::criteria::*;
pub use crate::errors::*;
pub use crate::solver::*;
pub use crate::types::*;

/// Env variable used to set the log level in examples, benches and tests
pub const BAYESOPT_LOG: &str = "BAYESOPT_LOG";

pub use crate::optimizers::{ACQ_MAX_EVAL, ACQ_N_POINTS, ACQ_N_START, ACQ_TIE_TOL};
