use crate::criteria::AcquisitionStrategy;
use crate::types::Goal;
use crate::utils::{norm_cdf, norm_pdf};
use bayesopt_gp::{GaussianProcess, Kernel};
use ndarray::ArrayView1;

use serde::{Deserialize, Serialize};

/// A structure for Expected Improvement implementation
///
/// The improvement is computed with regards to the smallest output observed by the GP.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedImprovement;

impl AcquisitionStrategy for ExpectedImprovement {
    fn name(&self) -> &'static str {
        "EI"
    }

    fn goal(&self) -> Goal {
        Goal::Maximize
    }

    /// Compute EI at given `x` point using the GP `gp`
    fn score<K: Kernel<f64>>(&self, gp: &GaussianProcess<f64, K>, x: &ArrayView1<f64>) -> f64 {
        let Some(fmin) = gp.y_min() else {
            return 0.0;
        };
        match gp.predict(x) {
            Ok((pred, variance)) => {
                if variance < f64::EPSILON {
                    0.0
                } else {
                    let sigma = variance.sqrt();
                    let args0 = (fmin - pred) / sigma;
                    let args1 = args0 * norm_cdf(args0);
                    let args2 = norm_pdf(args0);
                    sigma * (args1 + args2)
                }
            }
            _ => 0.0,
        }
    }
}
