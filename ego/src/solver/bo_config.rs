//! Bayesian optimizer configuration.
use crate::errors::{EgoError, Result};
use crate::optimizers::{ACQ_MAX_EVAL, ACQ_N_POINTS, ACQ_N_START, ACQ_TIE_TOL};
use crate::types::InitialSampling;
use linfa::ParamGuard;

use serde::{Deserialize, Serialize};

/// Default total number of objective evaluations
pub const BO_DEFAULT_TOTAL_BUDGET: usize = 20;
/// Default number of initial samples
pub const BO_DEFAULT_INITIAL_SAMPLES: usize = 5;

/// Validated Bayesian optimizer configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidBoConfig {
    /// Total number of objective evaluations (initial samples included)
    pub(crate) total_budget: usize,
    /// Number of initial samples drawn within the bounds before the sequential loop
    pub(crate) initial_samples: usize,
    /// A random generator seed used to get reproducible runs
    pub(crate) seed: Option<u64>,
    /// Initial sampling method
    pub(crate) sampling: InitialSampling,
    /// Number of local searches of the acquisition optimization
    pub(crate) n_start: usize,
    /// Number of coarse candidates per dimension of the acquisition optimization
    pub(crate) n_points: usize,
    /// Max number of acquisition evaluations of one local search
    pub(crate) max_eval: usize,
    /// Acquisition values closer than this tolerance are considered equal
    pub(crate) tie_tol: f64,
    /// Known target minimum used to stop the loop once reached
    pub(crate) target: f64,
    /// Directory to write optimization history
    pub(crate) outdir: Option<String>,
}

impl Default for ValidBoConfig {
    fn default() -> Self {
        ValidBoConfig {
            total_budget: BO_DEFAULT_TOTAL_BUDGET,
            initial_samples: BO_DEFAULT_INITIAL_SAMPLES,
            seed: None,
            sampling: InitialSampling::default(),
            n_start: ACQ_N_START,
            n_points: ACQ_N_POINTS,
            max_eval: ACQ_MAX_EVAL,
            tie_tol: ACQ_TIE_TOL,
            target: f64::NEG_INFINITY,
            outdir: None,
        }
    }
}

impl ValidBoConfig {
    /// Total number of objective evaluations
    pub fn total_budget(&self) -> usize {
        self.total_budget
    }

    /// Number of initial samples
    pub fn initial_samples(&self) -> usize {
        self.initial_samples
    }

    /// Random generator seed
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Initial sampling method
    pub fn sampling(&self) -> InitialSampling {
        self.sampling
    }

    /// Number of local searches of the acquisition optimization
    pub fn n_start(&self) -> usize {
        self.n_start
    }

    /// Number of coarse candidates per dimension
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Max number of acquisition evaluations of one local search
    pub fn max_eval(&self) -> usize {
        self.max_eval
    }

    /// Acquisition tie tolerance
    pub fn tie_tol(&self) -> f64 {
        self.tie_tol
    }

    /// Target minimum
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Output directory
    pub fn outdir(&self) -> Option<&str> {
        self.outdir.as_deref()
    }
}

/// Bayesian optimizer configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoConfig(ValidBoConfig);

impl BoConfig {
    /// Sets the total number of objective evaluations N, initial samples included
    pub fn total_budget(mut self, total_budget: usize) -> Self {
        self.0.total_budget = total_budget;
        self
    }

    /// Sets the number of initial samples N0 (0 <= N0 <= N)
    pub fn initial_samples(mut self, initial_samples: usize) -> Self {
        self.0.initial_samples = initial_samples;
        self
    }

    /// Allow to specify a seed for random number generator to allow
    /// reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = Some(seed);
        self
    }

    /// Sets the initial sampling method
    pub fn sampling(mut self, sampling: InitialSampling) -> Self {
        self.0.sampling = sampling;
        self
    }

    /// Sets the number of local searches run to optimize the acquisition (best result taken)
    pub fn n_start(mut self, n_start: usize) -> Self {
        self.0.n_start = n_start;
        self
    }

    /// Sets the number of coarse candidates per dimension used to optimize the acquisition
    pub fn n_points(mut self, n_points: usize) -> Self {
        self.0.n_points = n_points;
        self
    }

    /// Sets the max number of acquisition evaluations of one local search
    pub fn max_eval(mut self, max_eval: usize) -> Self {
        self.0.max_eval = max_eval;
        self
    }

    /// Sets the tolerance under which acquisition values are considered equal,
    /// the first found candidate being kept
    pub fn tie_tol(mut self, tie_tol: f64) -> Self {
        self.0.tie_tol = tie_tol;
        self
    }

    /// Sets a known target minimum to be used as a stopping criterion.
    pub fn target(mut self, target: f64) -> Self {
        self.0.target = target;
        self
    }

    /// Sets a directory to write optimization history
    pub fn outdir(mut self, outdir: impl Into<String>) -> Self {
        self.0.outdir = Some(outdir.into());
        self
    }

    /// Do not write optimization history
    pub fn no_outdir(mut self) -> Self {
        self.0.outdir = None;
        self
    }
}

impl From<ValidBoConfig> for BoConfig {
    fn from(valid: ValidBoConfig) -> Self {
        BoConfig(valid)
    }
}

impl ParamGuard for BoConfig {
    type Checked = ValidBoConfig;
    type Error = EgoError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let config = &self.0;
        if config.total_budget == 0 {
            return Err(EgoError::InvalidConfigError(
                "total budget should be positive".to_string(),
            ));
        }
        if config.initial_samples > config.total_budget {
            return Err(EgoError::InvalidConfigError(format!(
                "initial samples ({}) should not exceed total budget ({})",
                config.initial_samples, config.total_budget
            )));
        }
        if config.n_start == 0 || config.n_points == 0 || config.max_eval == 0 {
            return Err(EgoError::InvalidConfigError(format!(
                "acquisition optimization requires positive n_start, n_points and max_eval, got {}, {} and {}",
                config.n_start, config.n_points, config.max_eval
            )));
        }
        if !(config.tie_tol >= 0.) || config.tie_tol.is_infinite() {
            return Err(EgoError::InvalidConfigError(format!(
                "tie tolerance should be finite and non negative, got {}",
                config.tie_tol
            )));
        }
        if config.target.is_nan() {
            return Err(EgoError::InvalidConfigError(
                "target should not be NaN".to_string(),
            ));
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BoConfig::default().check().unwrap();
        assert_eq!(config.total_budget(), 20);
        assert_eq!(config.initial_samples(), 5);
        assert_eq!(config.seed(), None);
        assert_eq!(config.sampling(), InitialSampling::Lhs);
        assert_eq!(config.n_start(), 10);
        assert_eq!(config.n_points(), 100);
        assert_eq!(config.max_eval(), 200);
        assert_eq!(config.tie_tol(), 1e-12);
        assert_eq!(config.target(), f64::NEG_INFINITY);
        assert_eq!(config.outdir(), None);
    }

    #[test]
    fn test_config_builder() {
        let config = BoConfig::default()
            .total_budget(100)
            .initial_samples(20)
            .seed(42)
            .sampling(InitialSampling::Random)
            .target(1e-3)
            .outdir("target/history")
            .check()
            .unwrap();
        assert_eq!(config.total_budget(), 100);
        assert_eq!(config.initial_samples(), 20);
        assert_eq!(config.seed(), Some(42));
        assert_eq!(config.sampling(), InitialSampling::Random);
        assert_eq!(config.target(), 1e-3);
        assert_eq!(config.outdir(), Some("target/history"));

        let config = BoConfig::from(config).no_outdir().check().unwrap();
        assert_eq!(config.outdir(), None);
    }

    #[test]
    fn test_budget_all_initial_samples() {
        assert!(BoConfig::default()
            .total_budget(5)
            .initial_samples(5)
            .check()
            .is_ok());
    }

    #[test]
    fn test_no_initial_samples() {
        let config = BoConfig::default()
            .total_budget(10)
            .initial_samples(0)
            .check()
            .unwrap();
        assert_eq!(config.initial_samples(), 0);
    }

    #[test]
    fn test_invalid_config() {
        for config in [
            BoConfig::default().total_budget(4).initial_samples(5),
            BoConfig::default().total_budget(0).initial_samples(0),
            BoConfig::default().n_start(0),
            BoConfig::default().n_points(0),
            BoConfig::default().max_eval(0),
            BoConfig::default().tie_tol(-1.),
            BoConfig::default().tie_tol(f64::NAN),
            BoConfig::default().target(f64::NAN),
        ] {
            assert!(
                matches!(config.check_ref(), Err(EgoError::InvalidConfigError(_))),
                "{config:?}"
            );
        }
    }

    #[test]
    fn test_config_json() {
        // infinite values are written as null by serde_json
        let config = BoConfig::default().seed(7).total_budget(30).target(-1.);
        let json = serde_json::to_string(&config).unwrap();
        let loaded: BoConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, config);
    }
}
