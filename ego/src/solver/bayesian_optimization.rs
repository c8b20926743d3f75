use crate::criteria::AcquisitionStrategy;
use crate::errors::{EgoError, Result};
use crate::optimizers::LhsOptimizer;
use crate::solver::bo_config::{BoConfig, ValidBoConfig};
use crate::solver::bo_state::{BoState, Phase};
use crate::types::{InitialSampling, ObjectiveFn, OptimResult};
use crate::utils::check_xlimits;

use bayesopt_doe::{Lhs, Random, SamplingMethod};
use bayesopt_gp::{GaussianProcess, Kernel};
use linfa::ParamGuard;
use log::{debug, info};
use ndarray::{concatenate, Array1, Array2, ArrayBase, ArrayView1, Axis, Data, Ix1, Ix2};
use ndarray_npy::write_npy;
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use std::fmt;
use std::path::Path;
use std::time::Instant;

/// Json file where the configuration is written when `outdir` is specified
pub const CONFIG_FILE: &str = "bo_config.json";
/// Numpy filename for optimization history: one `[x, y]` row per evaluation
pub const HISTORY_FILE: &str = "bo_history.npy";

/// Builder of [BayesianOptimization] given a GP surrogate and an acquisition strategy
pub struct BayesianOptimizationBuilder<K: Kernel<f64>, S: AcquisitionStrategy> {
    gp: GaussianProcess<f64, K>,
    strategy: S,
    config: BoConfig,
    input_dim: Option<usize>,
}

impl<K: Kernel<f64>, S: AcquisitionStrategy> BayesianOptimizationBuilder<K, S> {
    /// Set up the optimizer configuration
    pub fn configure<F: FnOnce(BoConfig) -> BoConfig>(mut self, init: F) -> Self {
        self.config = init(self.config);
        self
    }

    /// Expected input dimension of the objective, checked against the bounds
    pub fn input_dim(mut self, input_dim: usize) -> Self {
        self.input_dim = Some(input_dim);
        self
    }

    /// Build the optimizer minimizing within `xlimits` bounds given as a (nx, 2) matrix
    /// where the ith row is the `[lower, upper]` interval of the ith component.
    ///
    /// Bounds, configuration and strategy are validated here, before any evaluation.
    pub fn min_within(
        self,
        xlimits: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    ) -> Result<BayesianOptimization<K, S>> {
        check_xlimits(xlimits)?;
        let nx = xlimits.nrows();
        if let Some(input_dim) = self.input_dim {
            if input_dim != nx {
                return Err(EgoError::InvalidBoundsError(format!(
                    "objective expects {input_dim} inputs, bounds specify {nx} dimensions"
                )));
            }
        }
        let config = self.config.check()?;
        self.strategy.validate()?;
        Ok(BayesianOptimization {
            config,
            xlimits: xlimits.to_owned(),
            gp: self.gp,
            strategy: self.strategy,
            state: BoState::new(nx),
        })
    }
}

/// Bayesian optimizer of an expensive black-box objective function.
///
/// A GP surrogate is trained on the observations, then the point optimizing
/// the acquisition strategy is evaluated and added to the observations,
/// until the evaluation budget is exhausted.
///
/// ```no_run
/// use bayesopt_ego::{BayesianOptimization, LowerConfidenceBound};
/// use bayesopt_gp::{GaussianProcess, RbfKernel};
/// use linfa::ParamGuard;
/// use ndarray::{array, ArrayView1};
///
/// let gp = GaussianProcess::new(
///     GaussianProcess::params(RbfKernel::default())
///         .noise_variance(1e-5)
///         .check()
///         .expect("GP parameters"),
/// );
/// let mut optimizer = BayesianOptimization::builder(gp, LowerConfidenceBound::default())
///     .configure(|config| config.total_budget(30).initial_samples(10).seed(42))
///     .min_within(&array![[-2., 2.], [-2., 2.]])
///     .expect("optimizer configured");
/// let x_opt = optimizer
///     .optimize(
///         |x: &ArrayView1<f64>| -> anyhow::Result<f64> { Ok(x[0] * x[0] + x[1] * x[1]) },
///         true,
///     )
///     .expect("optimization done");
/// ```
#[derive(Clone, Debug)]
pub struct BayesianOptimization<K: Kernel<f64>, S: AcquisitionStrategy> {
    config: ValidBoConfig,
    xlimits: Array2<f64>,
    gp: GaussianProcess<f64, K>,
    strategy: S,
    state: BoState,
}

impl<K: Kernel<f64>, S: AcquisitionStrategy> BayesianOptimization<K, S> {
    /// Start the building of an optimizer given a GP surrogate and an acquisition strategy
    pub fn builder(gp: GaussianProcess<f64, K>, strategy: S) -> BayesianOptimizationBuilder<K, S> {
        BayesianOptimizationBuilder {
            gp,
            strategy,
            config: BoConfig::default(),
            input_dim: None,
        }
    }

    /// Minimize the `objective` within the bounds and returns the best point found.
    ///
    /// Any previous run state is discarded. When `verbose` is set, a record per
    /// iteration is logged at info level (debug level otherwise).
    ///
    /// An objective failure stops the run and is returned as
    /// [EgoError::ObjectiveEvaluationError], the observations made so far being
    /// still available through [BayesianOptimization::state].
    pub fn optimize<O: ObjectiveFn>(
        &mut self,
        mut objective: O,
        verbose: bool,
    ) -> Result<Array1<f64>> {
        let nx = self.xlimits.nrows();
        self.state = BoState::new(nx);
        if let Some(input_dim) = objective.input_dim() {
            if input_dim != nx {
                return Err(EgoError::InvalidBoundsError(format!(
                    "objective expects {input_dim} inputs, bounds specify {nx} dimensions"
                )));
            }
        }
        self.write_config()?;

        let start = Instant::now();
        let mut rng = self.rng();

        self.state.phase = Phase::InitialSampling;
        let doe = self.initial_design(Xoshiro256Plus::seed_from_u64(rng.gen()));
        for x in doe.rows() {
            let y = evaluate(&mut objective, &x)?;
            self.state.add_observation(&x, y)?;
        }
        self.write_history()?;
        match self.state.best() {
            Some((x_best, y_best)) => report(
                verbose,
                format_args!(
                    "********* Initialization: Best fun(x[{}])={} at x={}",
                    self.state.best_index.unwrap_or(0),
                    y_best,
                    x_best
                ),
            ),
            None if self.state.n_observations() == 0 => report(
                verbose,
                format_args!("********* Initialization: no initial sample"),
            ),
            None => report(
                verbose,
                format_args!("********* Initialization: no finite objective value"),
            ),
        }

        self.state.phase = Phase::SequentialLoop;
        let total_budget = self.config.total_budget;
        while self.state.n_observations() < total_budget {
            if let Some((_, y_best)) = self.state.best() {
                if y_best <= self.config.target {
                    info!(
                        "Target {} reached after {} evaluations",
                        self.config.target,
                        self.state.n_observations()
                    );
                    break;
                }
            }
            let iter_start = Instant::now();
            let (x_data, y_data) = self.state.finite_observations();
            debug!("Train surrogate with {} points...", x_data.nrows());
            self.gp.fit(&x_data, &y_data)?;
            debug!("... surrogate trained: {}", self.gp);

            let (cost, x_next) = propose(
                &self.gp,
                &self.strategy,
                &self.xlimits,
                &self.config,
                Xoshiro256Plus::seed_from_u64(rng.gen()),
            );
            debug!(
                "Acquisition {} optimum found = {} at x={}",
                self.strategy.name(),
                cost,
                x_next
            );

            let y_next = evaluate(&mut objective, &x_next.view())?;
            let improved = self.state.add_observation(&x_next.view(), y_next)?;
            self.state.iter += 1;
            if improved {
                self.state.last_best_iter = self.state.iter;
            }
            self.write_history()?;

            let (best_index, y_best) = self
                .state
                .best()
                .map_or((0, f64::NAN), |(_, y)| (self.state.best_index.unwrap_or(0), y));
            report(
                verbose,
                format_args!(
                    "********* End iteration {}/{} in {:.3}s: fun(x)={} at x={}, Best fun(x[{}])={}{}",
                    self.state.iter,
                    total_budget - self.config.initial_samples,
                    iter_start.elapsed().as_secs_f64(),
                    y_next,
                    x_next,
                    best_index,
                    y_best,
                    if improved { " (improved)" } else { "" }
                ),
            );
        }
        self.state.phase = Phase::Terminated;

        let (x_best, y_best) = self.state.best().ok_or_else(|| {
            EgoError::InvalidValueError(format!(
                "no finite objective value among {} evaluations",
                self.state.n_observations()
            ))
        })?;
        report(
            verbose,
            format_args!(
                "Optimization done in {:.3}s: {} evaluations, Best fun={} at x={}",
                start.elapsed().as_secs_f64(),
                self.state.n_observations(),
                y_best,
                x_best
            ),
        );
        Ok(x_best.to_owned())
    }

    /// Propose the next point to evaluate given observations `x_data` (n, nx) and `y_data` (n,).
    ///
    /// The optimizer state is left untouched: a copy of the GP surrogate is trained
    /// on the given data then the acquisition strategy is optimized within the bounds.
    pub fn suggest(
        &self,
        x_data: &ArrayBase<impl Data<Elem = f64>, Ix2>,
        y_data: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    ) -> Result<Array1<f64>> {
        let nx = self.xlimits.nrows();
        if x_data.ncols() != nx {
            return Err(EgoError::InvalidValueError(format!(
                "expected points with {nx} components, got {}",
                x_data.ncols()
            )));
        }
        let mut gp = self.gp.clone();
        gp.fit(x_data, y_data)?;
        let mut rng = self.rng();
        let (_, x_next) = propose(
            &gp,
            &self.strategy,
            &self.xlimits,
            &self.config,
            Xoshiro256Plus::seed_from_u64(rng.gen()),
        );
        Ok(x_next)
    }

    /// Result of the last run, None while no finite objective value is known
    pub fn result(&self) -> Option<OptimResult> {
        self.state.best().map(|(x_opt, y_opt)| OptimResult {
            x_opt: x_opt.to_owned(),
            y_opt,
            x_doe: self.state.x_data.to_owned(),
            y_doe: self.state.y_data.to_owned(),
        })
    }

    /// Best-so-far point and objective value, available even after a failure
    pub fn best(&self) -> Option<(Array1<f64>, f64)> {
        self.state.best().map(|(x, y)| (x.to_owned(), y))
    }

    /// State of the current or last run
    pub fn state(&self) -> &BoState {
        &self.state
    }

    /// GP surrogate as trained at the last iteration
    pub fn gp(&self) -> &GaussianProcess<f64, K> {
        &self.gp
    }

    /// Acquisition strategy
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Validated configuration
    pub fn config(&self) -> &ValidBoConfig {
        &self.config
    }

    /// Bounds as a (nx, 2) matrix
    pub fn xlimits(&self) -> &Array2<f64> {
        &self.xlimits
    }

    fn rng(&self) -> Xoshiro256Plus {
        match self.config.seed {
            Some(seed) => Xoshiro256Plus::seed_from_u64(seed),
            None => Xoshiro256Plus::from_entropy(),
        }
    }

    fn initial_design(&self, rng: Xoshiro256Plus) -> Array2<f64> {
        let n = self.config.initial_samples;
        if n == 0 {
            return Array2::zeros((0, self.xlimits.nrows()));
        }
        match self.config.sampling {
            InitialSampling::Lhs => Lhs::new(&self.xlimits).with_rng(rng).sample(n),
            InitialSampling::Random => Random::new(&self.xlimits).with_rng(rng).sample(n),
        }
    }

    fn write_config(&self) -> Result<()> {
        if let Some(outdir) = self.config.outdir.as_ref() {
            std::fs::create_dir_all(outdir)?;
            let filepath = Path::new(outdir).join(CONFIG_FILE);
            std::fs::write(&filepath, serde_json::to_string(&self.config)?)?;
            debug!("Configuration written in {filepath:?}");
        }
        Ok(())
    }

    fn write_history(&self) -> Result<()> {
        if let Some(outdir) = self.config.outdir.as_ref() {
            let history = concatenate(
                Axis(1),
                &[
                    self.state.x_data.view(),
                    self.state.y_data.view().insert_axis(Axis(1)),
                ],
            )
            .map_err(|err| EgoError::InvalidValueError(err.to_string()))?;
            let filepath = Path::new(outdir).join(HISTORY_FILE);
            write_npy(&filepath, &history)?;
            debug!("History written in {filepath:?}");
        }
        Ok(())
    }
}

fn evaluate<O: ObjectiveFn>(objective: &mut O, x: &ArrayView1<f64>) -> Result<f64> {
    objective
        .evaluate(x)
        .map_err(EgoError::ObjectiveEvaluationError)
}

fn report(verbose: bool, record: fmt::Arguments) {
    if verbose {
        info!("{record}");
    } else {
        debug!("{record}");
    }
}

/// Minimize the acquisition cost of `strategy` given the `gp` surrogate within `xlimits`
fn propose<K: Kernel<f64>, S: AcquisitionStrategy>(
    gp: &GaussianProcess<f64, K>,
    strategy: &S,
    xlimits: &Array2<f64>,
    config: &ValidBoConfig,
    rng: Xoshiro256Plus,
) -> (f64, Array1<f64>) {
    let cost = |x: &[f64]| -> f64 { strategy.cost(gp, &ArrayView1::from(x)) };
    LhsOptimizer::new_with_rng(xlimits, &cost, rng)
        .n_start(config.n_start)
        .n_points(config.n_points)
        .max_eval(config.max_eval)
        .tie_tol(config.tie_tol)
        .minimize()
}
