use crate::optimizers::{ACQ_MAX_EVAL, ACQ_N_POINTS, ACQ_N_START, ACQ_TIE_TOL};
use crate::utils::clip;
use bayesopt_doe::{Lhs, LhsKind, SamplingMethod};
use cobyla::{minimize, Func, RhoBeg, StopTols};
use log::debug;
use ndarray::{Array1, Array2, ArrayView1, Zip};
use ndarray_rand::rand::Rng;
use rayon::prelude::*;

const COBYLA_RHOBEG: f64 = 0.1;
const COBYLA_FTOL_REL: f64 = 1e-6;

/// Minimizer of a cost function within a box.
///
/// Coarse-then-refine: `n_points * nx` candidates drawn by a classic LHS are
/// evaluated, the `n_start` best ones are used as starting points of bounded
/// COBYLA local searches run in parallel. Local search results are scanned in
/// starting order and replace the incumbent only when better by more than `tie_tol`.
pub(crate) struct LhsOptimizer<'a, R: Rng + Clone + Sync + Send> {
    xlimits: Array2<f64>,
    n_start: usize,
    n_points: usize,
    max_eval: usize,
    tie_tol: f64,
    obj: &'a (dyn Fn(&[f64]) -> f64 + Sync),
    rng: R,
}

impl<'a, R: Rng + Clone + Sync + Send> LhsOptimizer<'a, R> {
    pub fn new_with_rng(
        xlimits: &Array2<f64>,
        obj: &'a (dyn Fn(&[f64]) -> f64 + Sync),
        rng: R,
    ) -> LhsOptimizer<'a, R> {
        LhsOptimizer {
            xlimits: xlimits.to_owned(),
            n_start: ACQ_N_START,
            n_points: ACQ_N_POINTS,
            max_eval: ACQ_MAX_EVAL,
            tie_tol: ACQ_TIE_TOL,
            obj,
            rng,
        }
    }

    pub fn n_start(mut self, n_start: usize) -> Self {
        self.n_start = n_start;
        self
    }

    pub fn n_points(mut self, n_points: usize) -> Self {
        self.n_points = n_points;
        self
    }

    pub fn max_eval(mut self, max_eval: usize) -> Self {
        self.max_eval = max_eval;
        self
    }

    pub fn tie_tol(mut self, tie_tol: f64) -> Self {
        self.tie_tol = tie_tol;
        self
    }

    /// Cost value, NaN being mapped to +inf
    fn cost(&self, x: &[f64]) -> f64 {
        let c = (self.obj)(x);
        if c.is_nan() {
            f64::INFINITY
        } else {
            c
        }
    }

    /// Bounded local search from `x0` run in the unit hypercube
    /// so that the initial step is relevant in every dimension.
    fn local_search(&self, x0: ArrayView1<f64>) -> (f64, Array1<f64>) {
        let lower = self.xlimits.column(0);
        let range = &self.xlimits.column(1) - &lower;
        let to_x = |u: &[f64]| -> Vec<f64> {
            u.iter()
                .zip(lower.iter().zip(range.iter()))
                .map(|(u, (lo, r))| lo + u * r)
                .collect()
        };

        let u0: Vec<f64> = Zip::from(&x0)
            .and(&lower)
            .and(&range)
            .map_collect(|x, lo, r| ((x - lo) / r).clamp(0., 1.))
            .to_vec();
        let bounds = vec![(0., 1.); u0.len()];
        let cons: Vec<&dyn Func<()>> = vec![];

        let u_opt = match minimize(
            |u: &[f64], _: &mut ()| self.cost(&to_x(u)),
            &u0,
            &bounds,
            &cons,
            (),
            self.max_eval,
            RhoBeg::All(COBYLA_RHOBEG),
            Some(StopTols {
                ftol_rel: COBYLA_FTOL_REL,
                ..StopTols::default()
            }),
        ) {
            Ok((_, u_opt, _)) => u_opt,
            Err((status, u_opt, _)) => {
                debug!("Cobyla local search status={status:?}");
                u_opt
            }
        };
        let x_opt = clip(&Array1::from(to_x(&u_opt)), &self.xlimits);
        (self.cost(&x_opt.to_vec()), x_opt)
    }

    /// Returns the best `(cost, x)` found within the bounds
    pub fn minimize(&self) -> (f64, Array1<f64>) {
        let n = self.n_points * self.xlimits.nrows();
        let doe = Lhs::new(&self.xlimits)
            .kind(LhsKind::Classic)
            .with_rng(self.rng.clone())
            .sample(n);

        let mut costs = Array1::<f64>::zeros(n);
        Zip::from(&mut costs)
            .and(doe.rows())
            .par_for_each(|c, x| *c = self.cost(&x.to_vec()));

        // Stable sort: on equal costs the first drawn candidate comes first
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| costs[i].total_cmp(&costs[j]));
        let starts = &order[..self.n_start.min(n)];

        let refined = starts
            .par_iter()
            .map(|&i| self.local_search(doe.row(i)))
            .collect::<Vec<_>>();

        // Candidates within tie_tol of the incumbent keep the earliest one
        let mut best_i = 0;
        for (i, &c) in costs.iter().enumerate().skip(1) {
            if c < costs[best_i] - self.tie_tol {
                best_i = i;
            }
        }
        let (mut best_cost, mut best_x) = (costs[best_i], doe.row(best_i).to_owned());
        for (c, x) in refined {
            if c < best_cost - self.tie_tol {
                best_cost = c;
                best_x = x;
            }
        }
        (best_cost, clip(&best_x, &self.xlimits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn test_min_obj_only() {
        let obj = |x: &[f64]| -> f64 { x[0] * x[0] };
        let xlimits = array![[-1., 1.]];

        let (c, res) =
            LhsOptimizer::new_with_rng(&xlimits, &obj, Xoshiro256Plus::seed_from_u64(42))
                .minimize();
        assert_abs_diff_eq!(res, array![0.], epsilon = 1e-2);
        assert_abs_diff_eq!(c, 0., epsilon = 1e-4);
    }

    #[test]
    fn test_min_multimodal_2d() {
        // global minimum at (0.5, -0.3), local one at (-0.5, 0.5)
        let obj = |x: &[f64]| -> f64 {
            let global = (x[0] - 0.5).powi(2) + (x[1] + 0.3).powi(2);
            let local = (x[0] + 0.5).powi(2) + (x[1] - 0.5).powi(2) + 0.1;
            global.min(local)
        };
        let xlimits = array![[-1., 1.], [-1., 1.]];

        let (c, res) = LhsOptimizer::new_with_rng(&xlimits, &obj, Xoshiro256Plus::seed_from_u64(0))
            .n_start(5)
            .n_points(20)
            .minimize();
        assert_abs_diff_eq!(res, array![0.5, -0.3], epsilon = 1e-2);
        assert_abs_diff_eq!(c, 0., epsilon = 1e-4);
    }

    #[test]
    fn test_min_on_bounds() {
        let obj = |x: &[f64]| -> f64 { x[0] + x[1] };
        let xlimits = array![[-2., 2.], [1., 3.]];
        let (c, res) = LhsOptimizer::new_with_rng(&xlimits, &obj, Xoshiro256Plus::seed_from_u64(1))
            .minimize();
        assert_abs_diff_eq!(res, array![-2., 1.], epsilon = 1e-2);
        assert_abs_diff_eq!(c, -1., epsilon = 1e-2);
        assert!(res[0] >= -2. && res[1] >= 1.);
    }

    #[test]
    fn test_min_is_deterministic() {
        let obj = |x: &[f64]| -> f64 { (3. * x[0]).sin() + (x[0] - 0.2).powi(2) };
        let xlimits = array![[-3., 3.]];
        let run = || {
            LhsOptimizer::new_with_rng(&xlimits, &obj, Xoshiro256Plus::seed_from_u64(7))
                .n_start(4)
                .minimize()
        };
        let (c1, x1) = run();
        let (c2, x2) = run();
        assert_eq!(c1, c2);
        assert_eq!(x1, x2);
    }

    #[test]
    fn test_min_nan_never_selected() {
        let obj = |x: &[f64]| -> f64 {
            if x[0] < 0. {
                f64::NAN
            } else {
                (x[0] - 0.5).abs()
            }
        };
        let xlimits = array![[-1., 1.]];
        let (c, res) = LhsOptimizer::new_with_rng(&xlimits, &obj, Xoshiro256Plus::seed_from_u64(3))
            .minimize();
        assert!(c.is_finite());
        assert!(res[0] >= 0.);
    }

    #[test]
    fn test_tie_keeps_first_candidate() {
        let obj = |_: &[f64]| -> f64 { 1. };
        let xlimits = array![[0., 1.]];
        let rng = Xoshiro256Plus::seed_from_u64(5);
        let (c, res) = LhsOptimizer::new_with_rng(&xlimits, &obj, rng.clone())
            .n_points(10)
            .minimize();
        let first = Lhs::new(&xlimits)
            .kind(LhsKind::Classic)
            .with_rng(rng)
            .sample(10);
        assert_eq!(c, 1.);
        assert_eq!(res, first.row(0));
    }

    #[test]
    fn test_near_tie_keeps_first_candidate() {
        // costs differ by less than the tie tolerance
        let obj = |x: &[f64]| -> f64 { 1. + 1e-14 * x[0] };
        let xlimits = array![[0., 1.]];
        let rng = Xoshiro256Plus::seed_from_u64(11);
        let (_, res) = LhsOptimizer::new_with_rng(&xlimits, &obj, rng.clone())
            .n_points(10)
            .tie_tol(1e-12)
            .minimize();
        let first = Lhs::new(&xlimits)
            .kind(LhsKind::Classic)
            .with_rng(rng)
            .sample(10);
        assert_eq!(res, first.row(0));
    }
}
