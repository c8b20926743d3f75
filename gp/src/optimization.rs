use bayesopt_doe::{Lhs, LhsKind, SamplingMethod};
use ndarray::{arr1, s, Array1, Array2, Zip};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

pub(crate) struct CobylaParams {
    pub rhobeg: f64,
    pub ftol_rel: f64,
    pub maxeval: usize,
}

impl Default for CobylaParams {
    fn default() -> Self {
        CobylaParams {
            rhobeg: 0.5,
            ftol_rel: 1e-4,
            maxeval: 200,
        }
    }
}

/// Starting points for a multistart optimization in log10 space:
/// the clamped `param0` first then `n_start` points spread by a maximin LHS.
pub(crate) fn prepare_multistart(
    n_start: usize,
    param0: &Array1<f64>,
    bounds: &[(f64, f64)],
) -> (Array2<f64>, Vec<(f64, f64)>) {
    let bounds: Vec<(f64, f64)> = bounds
        .iter()
        .map(|(lo, up)| (lo.log10(), up.log10()))
        .collect();

    let mut starts = Array2::zeros((n_start + 1, param0.len()));
    Zip::from(starts.row_mut(0))
        .and(param0)
        .and(&bounds)
        .for_each(|s, p, (lo, up)| *s = p.log10().clamp(*lo, *up));

    if n_start > 0 {
        let mut xlimits = Array2::zeros((bounds.len(), 2));
        Zip::from(xlimits.rows_mut())
            .and(&bounds)
            .for_each(|mut row, limits| row.assign(&arr1(&[limits.0, limits.1])));
        // Seeded: starts only need to be spread over the bounds
        let seeds = Lhs::new(&xlimits)
            .kind(LhsKind::Maximin)
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .sample(n_start);
        starts.slice_mut(s![1.., ..]).assign(&seeds);
    }
    (starts, bounds)
}

/// Minimize `objfn` given an initial guess and bounds with COBYLA.
/// Returns the objective value (infinite when the optimizer fails) and the optimum.
pub(crate) fn optimize_params<ObjF>(
    objfn: ObjF,
    param0: &Array1<f64>,
    bounds: &[(f64, f64)],
    cobyla: CobylaParams,
) -> (f64, Array1<f64>)
where
    ObjF: Fn(&[f64]) -> f64,
{
    use cobyla::{minimize, Func, StopTols};

    let cons: Vec<&dyn Func<()>> = vec![];
    let param0 = param0.to_vec();

    match minimize(
        |x: &[f64], _u: &mut ()| objfn(x),
        &param0,
        bounds,
        &cons,
        (),
        cobyla.maxeval,
        cobyla::RhoBeg::All(cobyla.rhobeg),
        Some(StopTols {
            ftol_rel: cobyla.ftol_rel,
            ..StopTols::default()
        }),
    ) {
        Ok((_, x_opt, fval)) => {
            let fval = if f64::is_nan(fval) {
                f64::INFINITY
            } else {
                fval
            };
            (fval, arr1(&x_opt))
        }
        Err((status, x_opt, _)) => {
            log::warn!("ERROR Cobyla optimizer in GP status={status:?}");
            (f64::INFINITY, arr1(&x_opt))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_prepare_multistart() {
        let (starts, bounds) =
            prepare_multistart(4, &arr1(&[1e3, 0.5]), &[(1e-2, 1e2), (1e-2, 1e2)]);
        assert_eq!(starts.dim(), (5, 2));
        assert_eq!(bounds, vec![(-2., 2.), (-2., 2.)]);
        // first start is the clamped initial guess
        assert_abs_diff_eq!(starts[[0, 0]], 2.);
        assert_abs_diff_eq!(starts[[0, 1]], 0.5f64.log10());
        assert!(starts.iter().all(|v| (-2. ..=2.).contains(v)));
    }

    #[test]
    fn test_optimize_params() {
        let (fval, x_opt) = optimize_params(
            |x: &[f64]| (x[0] - 0.3).powi(2) + (x[1] + 0.2).powi(2),
            &arr1(&[1., 1.]),
            &[(-2., 2.), (-2., 2.)],
            CobylaParams {
                ftol_rel: 1e-10,
                ..CobylaParams::default()
            },
        );
        assert_abs_diff_eq!(fval, 0., epsilon = 1e-4);
        assert_abs_diff_eq!(x_opt, arr1(&[0.3, -0.2]), epsilon = 1e-2);
    }
}
