use approx::assert_abs_diff_eq;
use bayesopt::doe::{Lhs, SamplingMethod};
use bayesopt::ego::{BayesianOptimization, LowerConfidenceBound, Phase};
use bayesopt::gp::{GaussianProcess, Kernel, RbfKernel};
use linfa::ParamGuard;
use ndarray::{array, ArrayView1};

fn branin(x: &ArrayView1<f64>) -> anyhow::Result<f64> {
    let (a, b, c) = (1., 5.1 / (4. * std::f64::consts::PI.powi(2)), 5. / std::f64::consts::PI);
    let (r, s, t) = (6., 10., 1. / (8. * std::f64::consts::PI));
    Ok(a * (x[1] - b * x[0] * x[0] + c * x[0] - r).powi(2) + s * (1. - t) * x[0].cos() + s)
}

#[test]
fn test_gp_on_lhs_design() {
    let xlimits = array![[-5., 10.], [0., 15.]];
    let xt = Lhs::new(&xlimits).sample(12);
    let yt = xt.map_axis(ndarray::Axis(1), |x| branin(&x).unwrap());

    let kernel = RbfKernel::new(100., 4.);
    let mut gp = GaussianProcess::new(GaussianProcess::params(kernel).check().unwrap());
    gp.fit(&xt, &yt).unwrap();
    for (x, y) in xt.rows().into_iter().zip(yt.iter()) {
        let (mean, variance) = gp.predict(&x).unwrap();
        assert_abs_diff_eq!(mean, *y, epsilon = 1e-4 * y.abs().max(1.));
        assert!(variance < 1e-4 * gp.kernel().variance());
    }
}

#[test]
fn test_branin_minimization() {
    let gp = GaussianProcess::new(
        GaussianProcess::params(RbfKernel::new(1., 3.))
            .normalize_output(true)
            .noise_variance(1e-6)
            .check()
            .unwrap(),
    );
    let mut optimizer = BayesianOptimization::builder(gp, LowerConfidenceBound::default())
        .configure(|config| config.initial_samples(10).total_budget(30).seed(42))
        .input_dim(2)
        .min_within(&array![[-5., 10.], [0., 15.]])
        .expect("optimizer configured");
    let x_opt = optimizer.optimize(branin, false).unwrap();

    let state = optimizer.state();
    assert_eq!(state.phase(), Phase::Terminated);
    assert_eq!(state.n_observations(), 30);
    // global minimum value is 0.397887 at three locations
    let res = optimizer.result().unwrap();
    assert_eq!(res.x_opt, x_opt);
    assert!(res.y_opt < 2., "y_opt = {}", res.y_opt);
}
