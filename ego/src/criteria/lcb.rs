use crate::criteria::AcquisitionStrategy;
use crate::errors::{EgoError, Result};
use crate::types::Goal;
use bayesopt_gp::{GaussianProcess, Kernel};
use ndarray::ArrayView1;

use serde::{Deserialize, Serialize};

/// Default exploration constant
pub const LCB_DEFAULT_KAPPA: f64 = 2.;

/// Lower Confidence Bound `mean(x) - kappa * sigma(x)` to be minimized.
///
/// The larger `kappa`, the more high uncertainty regions are favored (exploration)
/// over low mean regions (exploitation).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LowerConfidenceBound {
    kappa: f64,
}

impl Default for LowerConfidenceBound {
    fn default() -> Self {
        LowerConfidenceBound {
            kappa: LCB_DEFAULT_KAPPA,
        }
    }
}

impl LowerConfidenceBound {
    /// Constructor given the exploration constant
    pub fn new(kappa: f64) -> Self {
        LowerConfidenceBound { kappa }
    }

    /// Exploration constant
    pub fn kappa(&self) -> f64 {
        self.kappa
    }
}

impl AcquisitionStrategy for LowerConfidenceBound {
    fn name(&self) -> &'static str {
        "LCB"
    }

    fn goal(&self) -> Goal {
        Goal::Minimize
    }

    /// Prediction failure gives +inf, hence the point is never selected
    fn score<K: Kernel<f64>>(&self, gp: &GaussianProcess<f64, K>, x: &ArrayView1<f64>) -> f64 {
        match gp.predict(x) {
            Ok((mean, variance)) => mean - self.kappa * variance.sqrt(),
            Err(_) => f64::INFINITY,
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.kappa.is_finite() || self.kappa < 0. {
            return Err(EgoError::InvalidConfigError(format!(
                "LCB kappa should be finite and non negative, got {}",
                self.kappa
            )));
        }
        Ok(())
    }
}
