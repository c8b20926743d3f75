use bayesopt_ego::{BayesianOptimization, LowerConfidenceBound, BAYESOPT_LOG};
use bayesopt_gp::{GaussianProcess, RbfKernel};
use env_logger::{Builder, Env};
use linfa::ParamGuard;
use ndarray::{array, ArrayView1};

/// Rosenbrock test function: min f(x)=0 at x=(1, 1)
struct Rosenbrock {
    a: f64,
    b: f64,
}

impl Rosenbrock {
    fn value(&self, x: &ArrayView1<f64>) -> f64 {
        (self.a - x[0]).powi(2) + self.b * (x[1] - x[0] * x[0]).powi(2)
    }
}

fn main() {
    let env = Env::new().filter_or(BAYESOPT_LOG, "info");
    let mut builder = Builder::from_env(env);
    let builder = builder.target(env_logger::Target::Stdout);
    builder.try_init().ok();

    let kernel = RbfKernel::default();
    let gp = GaussianProcess::new(
        GaussianProcess::params(kernel)
            .noise_variance(1e-5)
            .check()
            .expect("GP parameters"),
    );
    let strategy = LowerConfidenceBound::default();
    let func = Rosenbrock { a: 1., b: 100. };

    let xlimits = array![[-2., 2.], [-2., 2.]];
    let mut optimizer = BayesianOptimization::builder(gp, strategy)
        .configure(|config| config.initial_samples(100).total_budget(200))
        .min_within(&xlimits)
        .expect("Optimizer configured");
    let x_opt = optimizer
        .optimize(
            |x: &ArrayView1<f64>| -> anyhow::Result<f64> { Ok(func.value(x)) },
            true,
        )
        .expect("Minimize failure");
    let (_, y_opt) = optimizer.best().expect("Best point");
    println!("Ans: {x_opt}");
    println!("Rosenbrock minimum y = {y_opt} at x = {x_opt}");
}
