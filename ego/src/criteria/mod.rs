//! Acquisition strategies used to select the next point to evaluate
mod ei;
mod lcb;

pub use ei::ExpectedImprovement;
pub use lcb::{LowerConfidenceBound, LCB_DEFAULT_KAPPA};

use crate::errors::Result;
use crate::types::Goal;
use bayesopt_gp::{GaussianProcess, Kernel};
use ndarray::ArrayView1;

/// A trait for acquisition strategies which optimum location
/// with regards to the GP surrogate of the objective function
/// determines the next most promising point to evaluate.
pub trait AcquisitionStrategy: Clone + std::fmt::Debug + Send + Sync {
    /// Name of the acquisition strategy
    fn name(&self) -> &'static str;

    /// Whether the most promising point minimizes or maximizes the score
    fn goal(&self) -> Goal;

    /// Acquisition score at given point `x` with regards to the `gp` surrogate
    fn score<K: Kernel<f64>>(&self, gp: &GaussianProcess<f64, K>, x: &ArrayView1<f64>) -> f64;

    /// Value to be minimized to select the next point, NaN scores being never selected
    fn cost<K: Kernel<f64>>(&self, gp: &GaussianProcess<f64, K>, x: &ArrayView1<f64>) -> f64 {
        let score = self.score(gp, x);
        if score.is_nan() {
            return f64::INFINITY;
        }
        match self.goal() {
            Goal::Minimize => score,
            Goal::Maximize => -score,
        }
    }

    /// Check strategy parameters
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
