use crate::errors::{GpError, Result};
use crate::kernels::Kernel;
use linfa::{Float, ParamGuard};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Default number of multistart for hyperparameters optimization
pub const GP_OPTIM_N_START: usize = 10;
/// Default max number of likelihood evaluations for one COBYLA run
pub const GP_COBYLA_MAX_EVAL: usize = 50;
/// Default initial jitter relative to the mean of the covariance matrix diagonal
pub const GP_DEFAULT_JITTER: f64 = 1e-10;
/// Default number of jitter retries when the covariance matrix factorization fails
pub const GP_MAX_JITTER_RETRIES: usize = 5;

/// An enum to represent kernel hyperparameters tuning
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum HyperTuning<F: Float> {
    /// Kernel hyperparameters are used as given
    Fixed,
    /// Kernel hyperparameters maximize the log marginal likelihood within given bounds (lower, upper),
    /// the kernel given in parameters is used as the first starting point.
    Optimized {
        /// Bounds for the signal variance σ²
        variance_bounds: (F, F),
        /// Bounds for the length-scale ℓ
        length_scale_bounds: (F, F),
    },
}

impl<F: Float> Default for HyperTuning<F> {
    fn default() -> Self {
        HyperTuning::Fixed
    }
}

impl<F: Float> HyperTuning<F> {
    /// Default bounds for signal variance
    pub const DEFAULT_VARIANCE_BOUNDS: (f64, f64) = (1e-4, 1e4);
    /// Default bounds for length-scale
    pub const DEFAULT_LENGTH_SCALE_BOUNDS: (f64, f64) = (1e-2, 1e2);

    /// Optimized tuning with default bounds
    pub fn optimized() -> Self {
        HyperTuning::Optimized {
            variance_bounds: (
                F::cast(Self::DEFAULT_VARIANCE_BOUNDS.0),
                F::cast(Self::DEFAULT_VARIANCE_BOUNDS.1),
            ),
            length_scale_bounds: (
                F::cast(Self::DEFAULT_LENGTH_SCALE_BOUNDS.0),
                F::cast(Self::DEFAULT_LENGTH_SCALE_BOUNDS.1),
            ),
        }
    }

    /// Bounds as `[variance bounds, length-scale bounds]` if any
    pub fn bounds(&self) -> Option<[(F, F); 2]> {
        match self {
            HyperTuning::Fixed => None,
            HyperTuning::Optimized {
                variance_bounds,
                length_scale_bounds,
            } => Some([*variance_bounds, *length_scale_bounds]),
        }
    }
}

/// A set of validated GP parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(
        serialize = "F: Serialize, K: Serialize",
        deserialize = "F: Deserialize<'de>, K: Deserialize<'de>"
    ))
)]
pub struct GpValidParams<F: Float, K: Kernel<F>> {
    /// Covariance function with its initial hyperparameters
    pub(crate) kernel: K,
    /// Observation noise variance added to the covariance matrix diagonal
    pub(crate) noise_variance: F,
    /// Mean of the GP prior
    pub(crate) prior_mean: F,
    /// Whether outputs are standardized before fitting
    pub(crate) normalize_output: bool,
    /// Kernel hyperparameters tuning
    pub(crate) hyper_tuning: HyperTuning<F>,
    /// Number of internal likelihood optimization restart
    pub(crate) n_start: usize,
    /// Max number of likelihood evaluations for one optimization run
    pub(crate) max_eval: usize,
    /// Initial jitter relative to the mean of the covariance diagonal
    pub(crate) jitter: F,
    /// Max number of factorization retries with an increasing jitter
    pub(crate) max_jitter_retries: usize,
}

impl<F: Float, K: Kernel<F>> Default for GpValidParams<F, K> {
    fn default() -> GpValidParams<F, K> {
        GpValidParams {
            kernel: K::default(),
            noise_variance: F::zero(),
            prior_mean: F::zero(),
            normalize_output: false,
            hyper_tuning: HyperTuning::default(),
            n_start: GP_OPTIM_N_START,
            max_eval: GP_COBYLA_MAX_EVAL,
            jitter: F::cast(GP_DEFAULT_JITTER),
            max_jitter_retries: GP_MAX_JITTER_RETRIES,
        }
    }
}

impl<F: Float, K: Kernel<F>> GpValidParams<F, K> {
    /// Get covariance function
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Get observation noise variance
    pub fn noise_variance(&self) -> F {
        self.noise_variance
    }

    /// Get prior mean
    pub fn prior_mean(&self) -> F {
        self.prior_mean
    }

    /// Whether outputs are standardized
    pub fn normalize_output(&self) -> bool {
        self.normalize_output
    }

    /// Get hyperparameters tuning
    pub fn hyper_tuning(&self) -> &HyperTuning<F> {
        &self.hyper_tuning
    }

    /// Get the number of internal optimization restart
    pub fn n_start(&self) -> usize {
        self.n_start
    }

    /// Get the max number of internal likelihood evaluations during one optimization
    pub fn max_eval(&self) -> usize {
        self.max_eval
    }

    /// Get initial relative jitter
    pub fn jitter(&self) -> F {
        self.jitter
    }

    /// Get max number of jitter retries
    pub fn max_jitter_retries(&self) -> usize {
        self.max_jitter_retries
    }
}

#[derive(Clone, Debug)]
/// The set of hyperparameters that can be specified for the execution of
/// the [GP algorithm](crate::GaussianProcess).
pub struct GpParams<F: Float, K: Kernel<F>>(GpValidParams<F, K>);

impl<F: Float, K: Kernel<F>> GpParams<F, K> {
    /// A constructor for GP parameters given a kernel
    pub fn new(kernel: K) -> GpParams<F, K> {
        Self(GpValidParams {
            kernel,
            ..Default::default()
        })
    }

    /// Set kernel.
    pub fn kernel(mut self, kernel: K) -> Self {
        self.0.kernel = kernel;
        self
    }

    /// Set observation noise variance ε (ε >= 0).
    pub fn noise_variance(mut self, noise_variance: F) -> Self {
        self.0.noise_variance = noise_variance;
        self
    }

    /// Set the prior mean, the prediction when no observation is available.
    pub fn prior_mean(mut self, prior_mean: F) -> Self {
        self.0.prior_mean = prior_mean;
        self
    }

    /// Standardize outputs with their observed mean and standard deviation.
    ///
    /// When set, the prior mean is only used when no observation is available.
    pub fn normalize_output(mut self, normalize_output: bool) -> Self {
        self.0.normalize_output = normalize_output;
        self
    }

    /// Set kernel hyperparameters tuning
    pub fn hyper_tuning(mut self, hyper_tuning: HyperTuning<F>) -> Self {
        self.0.hyper_tuning = hyper_tuning;
        self
    }

    /// Set the number of internal hyperparameters optimization restarts
    pub fn n_start(mut self, n_start: usize) -> Self {
        self.0.n_start = n_start;
        self
    }

    /// Set the max number of internal likelihood evaluations during one optimization
    pub fn max_eval(mut self, max_eval: usize) -> Self {
        self.0.max_eval = max_eval;
        self
    }

    /// Set the initial jitter, relative to the mean of the covariance diagonal.
    ///
    /// Jitter is only added when the factorization of the covariance matrix fails,
    /// it is multiplied by 10 at each retry.
    pub fn jitter(mut self, jitter: F) -> Self {
        self.0.jitter = jitter;
        self
    }

    /// Set the max number of factorization retries
    pub fn max_jitter_retries(mut self, max_jitter_retries: usize) -> Self {
        self.0.max_jitter_retries = max_jitter_retries;
        self
    }
}

impl<F: Float, K: Kernel<F>> From<GpValidParams<F, K>> for GpParams<F, K> {
    fn from(valid: GpValidParams<F, K>) -> Self {
        GpParams(valid)
    }
}

fn check_bounds<F: Float>(name: &str, (lo, up): (F, F)) -> Result<()> {
    if !(lo.is_finite() && up.is_finite() && lo > F::zero() && lo < up) {
        return Err(GpError::InvalidConfigError(format!(
            "{name} bounds should be positive with lower < upper, got ({lo}, {up})"
        )));
    }
    Ok(())
}

impl<F: Float, K: Kernel<F>> ParamGuard for GpParams<F, K> {
    type Checked = GpValidParams<F, K>;
    type Error = GpError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let params = &self.0;
        let noise = params.noise_variance;
        if !noise.is_finite() || noise < F::zero() {
            return Err(GpError::InvalidConfigError(format!(
                "noise variance should be finite and non negative, got {noise}"
            )));
        }
        let (variance, length_scale) = (params.kernel.variance(), params.kernel.length_scale());
        if !(variance.is_finite() && variance > F::zero())
            || !(length_scale.is_finite() && length_scale > F::zero())
        {
            return Err(GpError::InvalidConfigError(format!(
                "kernel hyperparameters should be positive, got variance={variance}, length_scale={length_scale}"
            )));
        }
        if !params.prior_mean.is_finite() {
            return Err(GpError::InvalidConfigError(
                "prior mean should be finite".to_string(),
            ));
        }
        if !params.jitter.is_finite() || params.jitter < F::zero() {
            return Err(GpError::InvalidConfigError(format!(
                "jitter should be finite and non negative, got {}",
                params.jitter
            )));
        }
        if let HyperTuning::Optimized {
            variance_bounds,
            length_scale_bounds,
        } = params.hyper_tuning
        {
            check_bounds("variance", variance_bounds)?;
            check_bounds("length-scale", length_scale_bounds)?;
            if params.n_start == 0 || params.max_eval == 0 {
                return Err(GpError::InvalidConfigError(
                    "hyperparameters optimization requires n_start > 0 and max_eval > 0"
                        .to_string(),
                ));
            }
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
    use crate::kernels::{Matern52Kernel, RbfKernel};

    #[test]
    fn test_default_params() {
        let params = GpParams::new(RbfKernel::<f64>::default()).check().unwrap();
        assert_eq!(params.noise_variance(), 0.);
        assert_eq!(params.prior_mean(), 0.);
        assert!(!params.normalize_output());
        assert_eq!(params.hyper_tuning(), &HyperTuning::Fixed);
        assert_eq!(params.jitter(), GP_DEFAULT_JITTER);
        assert_eq!(params.max_jitter_retries(), GP_MAX_JITTER_RETRIES);
    }

    #[test]
    fn test_invalid_noise() {
        let res = GpParams::new(RbfKernel::default())
            .noise_variance(-1e-3)
            .check();
        assert!(matches!(res, Err(GpError::InvalidConfigError(_))));
        let res = GpParams::new(RbfKernel::default())
            .noise_variance(f64::NAN)
            .check();
        assert!(matches!(res, Err(GpError::InvalidConfigError(_))));
    }

    #[test]
    fn test_invalid_kernel_hyperparameters() {
        for (variance, length_scale) in [(0., 1.), (1., 0.), (-1., 1.), (1., f64::INFINITY)] {
            let res = GpParams::new(Matern52Kernel::new(variance, length_scale)).check();
            assert!(
                matches!(res, Err(GpError::InvalidConfigError(_))),
                "({variance}, {length_scale}) should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_tuning_bounds() {
        let res = GpParams::new(RbfKernel::default())
            .hyper_tuning(HyperTuning::Optimized {
                variance_bounds: (1e-2, 1e2),
                length_scale_bounds: (1., 0.1),
            })
            .check();
        assert!(matches!(res, Err(GpError::InvalidConfigError(_))));

        let res = GpParams::new(RbfKernel::<f64>::default())
            .hyper_tuning(HyperTuning::optimized())
            .n_start(0)
            .check();
        assert!(matches!(res, Err(GpError::InvalidConfigError(_))));

        let params =
            GpParams::new(RbfKernel::<f64>::default()).hyper_tuning(HyperTuning::optimized());
        assert!(params.check_ref().is_ok());
    }
}
