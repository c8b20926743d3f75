use bayesopt_gp::{GaussianProcess, HyperTuning, SquaredExponentialKernel};
use linfa::ParamGuard;
use ndarray::{arr2, concatenate, Array, Array1, Array2, Axis};

fn xsinx(x: &Array2<f64>) -> Array1<f64> {
    x.column(0)
        .mapv(|v| (v - 3.5) * ((v - 3.5) / std::f64::consts::PI).sin())
}

fn main() {
    let xt = arr2(&[[0.0], [5.0], [10.0], [15.0], [18.0], [20.0], [25.0]]);
    let yt = xsinx(&xt);

    println!("Train GP surrogate of 'xsinx' at {}", xt.column(0));
    let params = GaussianProcess::params(SquaredExponentialKernel::default())
        .normalize_output(true)
        .hyper_tuning(HyperTuning::optimized())
        .check()
        .expect("GP parameters");
    let mut gp = GaussianProcess::new(params);
    gp.fit(&xt, &yt).expect("GP fitting");
    println!("Fitted {}", gp);

    let xtest = Array::linspace(0., 25., 26).insert_axis(Axis(1));
    let ytest = xsinx(&xtest);
    let (ypred, yvar) = gp.predict_valvar(&xtest).expect("GP prediction");
    let ysigma = yvar.mapv(f64::sqrt);

    println!("Compute prediction errors (x, err(x), sigma(x))");
    println!(
        "{}",
        concatenate![
            Axis(1),
            xtest,
            (ypred - ytest).insert_axis(Axis(1)),
            ysigma.insert_axis(Axis(1))
        ]
    );
}
