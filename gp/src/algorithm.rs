use crate::errors::{GpError, Result};
use crate::kernels::Kernel;
use crate::optimization::{optimize_params, prepare_multistart, CobylaParams};
use crate::parameters::{GpParams, GpValidParams};
use crate::utils::{mean_std, to_f64};

use linfa::Float;
use linfa_linalg::{cholesky::*, triangular::*};
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix1, Ix2};
use rayon::prelude::*;
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Internal parameters computed at fit time and used later on in predictions
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(deserialize = "F: Deserialize<'de>"))
)]
pub(crate) struct GpInnerParams<F: Float> {
    /// Lower Cholesky factor L of the covariance matrix K + εI (+ jitter)
    chol: Array2<F>,
    /// Weights w solving (K + εI) w = z, z being the shifted and scaled outputs
    weights: Array1<F>,
    /// Output shift
    y_offset: F,
    /// Output scale
    y_scale: F,
    /// Absolute jitter added to the covariance diagonal
    jitter: F,
    /// Log marginal likelihood of the shifted and scaled outputs
    likelihood: F,
}

/// Gaussian Process regression model
///
/// The GP owns its observations `(x_i, y_i)` and a [Kernel] `k`. Fitting computes the
/// Cholesky factor `L` of `K + εI` where `K_ij = k(x_i, x_j)` and `ε` is the noise variance,
/// then the weights `w` solving `(K + εI) w = y - m` where `m` is the prior mean.
/// The posterior at `x*` is given by
///
/// * mean: `m + k*ᵗ w`
/// * variance: `k(x*, x*) − vᵗ v` with `L v = k*`, clamped to 0
///
/// where `k*` is the vector of `k(x*, x_i)`. Without observations the prior is returned.
///
/// When the factorization fails, a jitter relative to the mean of the diagonal is added,
/// multiplied by 10 at each retry, until the max number of retries is reached which leads to
/// a [GpError::NumericalError].
///
/// Fitting is O(n³) in the number of observations n, which suits Bayesian optimization
/// where observations are expensive and hence few.
///
/// # Example
///
/// ```
/// use bayesopt_gp::{GaussianProcess, RbfKernel};
/// use linfa::ParamGuard;
/// use ndarray::{arr1, arr2};
///
/// let params = GaussianProcess::<f64, _>::params(RbfKernel::new(1., 0.5))
///     .noise_variance(1e-8)
///     .check()
///     .expect("valid parameters");
/// let mut gp = GaussianProcess::new(params);
///
/// let xt = arr2(&[[0.], [0.5], [1.]]);
/// let yt = arr1(&[0., 0.25, 1.]);
/// gp.fit(&xt, &yt).expect("GP fitted");
///
/// let (mean, variance) = gp.predict(&arr1(&[0.5])).expect("GP prediction");
/// assert!((mean - 0.25).abs() < 1e-6);
/// assert!(variance < 1e-6);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(
        serialize = "F: Serialize, K: Serialize",
        deserialize = "F: Deserialize<'de>, K: Deserialize<'de>"
    ))
)]
pub struct GaussianProcess<F: Float, K: Kernel<F>> {
    /// Parameters
    params: GpValidParams<F, K>,
    /// Kernel used for predictions (tuned when hyperparameters are optimized)
    kernel: K,
    /// Training inputs (n, nx)
    xtrain: Array2<F>,
    /// Training outputs (n,)
    ytrain: Array1<F>,
    /// Input dimension once known
    dim: Option<usize>,
    /// Factorization state, none when there is no observation
    inner: Option<GpInnerParams<F>>,
}

impl<F: Float, K: Kernel<F>> fmt::Display for GaussianProcess<F, K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "GP(kernel={}, noise_variance={}, n_obs={})",
            self.kernel,
            self.params.noise_variance,
            self.n_observations()
        )
    }
}

impl<F: Float, K: Kernel<F>> GaussianProcess<F, K> {
    /// Gp parameters contructor
    pub fn params(kernel: K) -> GpParams<F, K> {
        GpParams::new(kernel)
    }

    /// A GP without observation, predictions return the prior
    pub fn new(params: GpValidParams<F, K>) -> Self {
        GaussianProcess {
            kernel: params.kernel.clone(),
            params,
            xtrain: Array2::zeros((0, 0)),
            ytrain: Array1::zeros(0),
            dim: None,
            inner: None,
        }
    }

    /// Fit the GP on `x` (n, nx) inputs and `y` (n,) outputs which replace
    /// the current observations.
    ///
    /// Hyperparameters are tuned first when required then the covariance matrix is factorized.
    /// When n = 0, the GP is reset to its prior. On error the GP is left unchanged.
    pub fn fit(
        &mut self,
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
        y: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(GpError::InvalidValueError(format!(
                "x and y should have the same number of observations, got {} and {}",
                x.nrows(),
                y.len()
            )));
        }
        if x.nrows() == 0 {
            debug!("GP reset to prior");
            self.kernel = self.params.kernel.clone();
            self.xtrain = x.to_owned();
            self.ytrain = y.to_owned();
            self.dim = Some(x.ncols());
            self.inner = None;
            return Ok(());
        }
        if x.ncols() == 0 {
            return Err(GpError::InvalidValueError(
                "x should have at least one component".to_string(),
            ));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(GpError::InvalidValueError(
                "training data should be finite".to_string(),
            ));
        }

        let (y_offset, y_scale) = if self.params.normalize_output {
            mean_std(y)
        } else {
            (self.params.prior_mean, F::one())
        };
        let xtrain = x.to_owned();
        let z = y.mapv(|v| (v - y_offset) / y_scale);

        let kernel = match self.params.hyper_tuning.bounds() {
            Some(bounds) => self.optimize_kernel(&xtrain, &z, bounds),
            None => self.params.kernel.clone(),
        };

        let (chol, weights, jitter, likelihood) = factorize(&kernel, &xtrain, &z, &self.params)?;
        if jitter > F::zero() {
            warn!(
                "Covariance matrix not positive definite: jitter {:e} added to its diagonal",
                jitter
            );
        }
        debug!(
            "GP fitted on {} observations: kernel={}, likelihood={}",
            xtrain.nrows(),
            kernel,
            likelihood
        );

        self.kernel = kernel;
        self.dim = Some(xtrain.ncols());
        self.xtrain = xtrain;
        self.ytrain = y.to_owned();
        self.inner = Some(GpInnerParams {
            chol,
            weights,
            y_offset,
            y_scale,
            jitter,
            likelihood,
        });
        Ok(())
    }

    /// Kernel hyperparameters maximizing the log marginal likelihood in log10 space
    fn optimize_kernel(&self, x: &Array2<F>, z: &Array1<F>, bounds: [(F, F); 2]) -> K {
        let base: f64 = 10.;
        let objfn = |p: &[f64]| -> f64 {
            // optimizer may return nan values
            if p.iter().any(|v| v.is_nan()) {
                return f64::INFINITY;
            }
            let kernel = self
                .params
                .kernel
                .with_hyperparameters(F::cast(base.powf(p[0])), F::cast(base.powf(p[1])));
            match factorize(&kernel, x, z, &self.params) {
                Ok((_, _, _, likelihood)) => -to_f64(likelihood),
                Err(_) => f64::INFINITY,
            }
        };

        let init = self.params.kernel.hyperparameters().mapv(to_f64);
        let bounds = bounds.map(|(lo, up)| (to_f64(lo), to_f64(up)));
        let (starts, bounds) = prepare_multistart(self.params.n_start, &init, &bounds);
        debug!("Optimize with multistart params = {starts:?} and bounds = {bounds:?}");

        let now = Instant::now();
        let results: Vec<(f64, Array1<f64>)> = (0..starts.nrows())
            .into_par_iter()
            .map(|i| {
                optimize_params(
                    &objfn,
                    &starts.row(i).to_owned(),
                    &bounds,
                    CobylaParams {
                        maxeval: self.params.max_eval,
                        ..CobylaParams::default()
                    },
                )
            })
            .collect();
        debug!("elapsed optim = {:?}", now.elapsed().as_millis());

        // results are scanned in start order, ties keep the first one
        let mut best: Option<(f64, Array1<f64>)> = None;
        for (fval, params) in results {
            if fval.is_finite() && best.as_ref().map_or(true, |(fbest, _)| fval < *fbest) {
                best = Some((fval, params));
            }
        }
        match best {
            Some((_, params)) => {
                let p: Vec<F> = params
                    .iter()
                    .zip(bounds.iter())
                    .map(|(v, (lo, up))| F::cast(base.powf(v.clamp(*lo, *up))))
                    .collect();
                self.params.kernel.with_hyperparameters(p[0], p[1])
            }
            None => {
                warn!("Hyperparameters optimization failed, initial kernel is kept");
                self.params.kernel.clone()
            }
        }
    }

    /// Predict mean and variance at a single point `x` (nx,)
    pub fn predict(&self, x: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Result<(F, F)> {
        let (mean, variance) = self.predict_valvar(&x.view().insert_axis(Axis(0)))?;
        Ok((mean[0], variance[0]))
    }

    /// Predict output values at n given `x` points of nx components specified as a (n, nx) matrix.
    /// Returns n scalar output values as a vector (n,).
    pub fn predict_values(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Array1<F>> {
        self.check_dim(x.ncols())?;
        match &self.inner {
            None => Ok(Array1::from_elem(x.nrows(), self.params.prior_mean)),
            Some(inner) => {
                let kx = self.kernel.matrix(&self.xtrain, x);
                Ok(kx
                    .t()
                    .dot(&inner.weights)
                    .mapv(|v| inner.y_offset + inner.y_scale * v))
            }
        }
    }

    /// Predict variance values at n given `x` points of nx components specified
    /// as a (n, nx) matrix.
    /// Returns n variance values as (n,) column vector.
    pub fn predict_variances(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Array1<F>> {
        let (_, variances) = self.predict_valvar(x)?;
        Ok(variances)
    }

    /// Predict both output values and variances at n given `x` points of nx components
    pub fn predict_valvar(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Result<(Array1<F>, Array1<F>)> {
        self.check_dim(x.ncols())?;
        let prior_var: Array1<F> = x
            .rows()
            .into_iter()
            .map(|r| self.kernel.evaluate(&r, &r))
            .collect();
        match &self.inner {
            None => Ok((Array1::from_elem(x.nrows(), self.params.prior_mean), prior_var)),
            Some(inner) => {
                let kx = self.kernel.matrix(&self.xtrain, x);
                let mean = kx
                    .t()
                    .dot(&inner.weights)
                    .mapv(|v| inner.y_offset + inner.y_scale * v);
                let v = inner.chol.solve_triangular(&kx, UPLO::Lower)?;
                let scale2 = inner.y_scale * inner.y_scale;
                // Variance might be slightly negative depending on
                // machine precision: set to zero in that case
                let variance = (prior_var - v.mapv(|e| e * e).sum_axis(Axis(0)))
                    .mapv(|s| (scale2 * s).max(F::zero()));
                Ok((mean, variance))
            }
        }
    }

    fn check_dim(&self, nx: usize) -> Result<()> {
        match self.dim {
            Some(dim) if dim != nx => Err(GpError::InvalidValueError(format!(
                "expected points with {dim} components, got {nx}"
            ))),
            _ => Ok(()),
        }
    }

    /// Kernel used in predictions, with tuned hyperparameters if any
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Parameters the GP was created with
    pub fn valid_params(&self) -> &GpValidParams<F, K> {
        &self.params
    }

    /// Number of observations
    pub fn n_observations(&self) -> usize {
        self.ytrain.len()
    }

    /// Observations as `(x, y)`, respectively (n, nx) and (n,) arrays
    pub fn observations(&self) -> (ArrayView2<F>, ArrayView1<F>) {
        (self.xtrain.view(), self.ytrain.view())
    }

    /// Smallest observed output
    pub fn y_min(&self) -> Option<F> {
        self.ytrain
            .iter()
            .copied()
            .fold(None, |acc, v| match acc {
                Some(m) if m <= v => Some(m),
                _ => Some(v),
            })
    }

    /// Absolute jitter which was added to the covariance diagonal at last fit
    pub fn jitter(&self) -> F {
        self.inner.as_ref().map_or(F::zero(), |inner| inner.jitter)
    }

    /// Log marginal likelihood of the (normalized) outputs at last fit
    pub fn likelihood(&self) -> Option<F> {
        self.inner.as_ref().map(|inner| inner.likelihood)
    }

    /// Input dimension, known after the first fit
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }
}

/// Cholesky factorization of `mx` accepted only when its pivots are large enough
fn cholesky_checked<F: Float>(mx: &Array2<F>, min_pivot: F) -> Option<Array2<F>> {
    let chol = mx.cholesky().ok()?;
    let valid = chol.iter().all(|v| v.is_finite()) && chol.diag().iter().all(|&d| d > min_pivot);
    valid.then_some(chol)
}

/// Factorize the covariance matrix of `x` with jitter retries and compute
/// the GP weights for outputs `z`. Returns `(L, w, jitter, log marginal likelihood)`.
fn factorize<F: Float, K: Kernel<F>>(
    kernel: &K,
    x: &Array2<F>,
    z: &Array1<F>,
    params: &GpValidParams<F, K>,
) -> Result<(Array2<F>, Array1<F>, F, F)> {
    let mut cov = kernel.matrix(x, x);
    cov.diag_mut().mapv_inplace(|v| v + params.noise_variance);

    let n = F::cast(x.nrows());
    let mean_diag = cov.diag().fold(F::zero(), |acc, &v| acc + v) / n;
    let mean_diag = if mean_diag > F::zero() {
        mean_diag
    } else {
        F::one()
    };
    // pivots below round-off level are considered as a failure
    let min_pivot = (F::cast(100.) * F::epsilon() * mean_diag).sqrt();

    let mut jitter = F::zero();
    let mut chol = cholesky_checked(&cov, min_pivot);
    let mut retry = 0;
    while chol.is_none() && retry < params.max_jitter_retries {
        let added = params.jitter * mean_diag * F::cast(10f64.powi(retry as i32));
        let mut mx = cov.to_owned();
        mx.diag_mut().mapv_inplace(|v| v + added);
        chol = cholesky_checked(&mx, min_pivot);
        jitter = added;
        retry += 1;
    }
    let chol = chol.ok_or_else(|| {
        GpError::NumericalError(format!(
            "covariance matrix factorization failed after {} jitter retries (last jitter {:e})",
            params.max_jitter_retries, jitter
        ))
    })?;

    let zt = chol.solve_triangular(&z.to_owned().insert_axis(Axis(1)), UPLO::Lower)?;
    let weights = chol
        .t()
        .solve_triangular(&zt, UPLO::Upper)?
        .remove_axis(Axis(1));

    // log p(z) = -zᵗw/2 - sum(log(L_ii)) - n log(2π)/2
    let logdet = chol.diag().fold(F::zero(), |acc, &v| acc + v.ln());
    let likelihood = F::cast(-0.5) * z.dot(&weights)
        - logdet
        - F::cast(0.5) * n * F::cast(2. * std::f64::consts::PI).ln();
    if !likelihood.is_finite() || weights.iter().any(|w| !w.is_finite()) {
        return Err(GpError::NumericalError(
            "GP weights computation is not finite".to_string(),
        ));
    }
    Ok((chol, weights, jitter, likelihood))
}
