use bayesopt_doe::{Lhs, SamplingMethod};
use bayesopt_gp::{GaussianProcess, HyperTuning, Matern52Kernel, RbfKernel};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use linfa::ParamGuard;
use ndarray::{array, Array1, Array2};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn griewank(x: &Array2<f64>) -> Array1<f64> {
    let dim = x.ncols();
    let d = Array1::linspace(1., dim as f64, dim).mapv(|v| v.sqrt());
    x.rows()
        .into_iter()
        .map(|x| {
            x.mapv(|v| v * v).sum() / 4000.
                - (&x / &d).mapv(|v| v.cos()).fold(1., |acc, x| acc * x)
                + 1.0
        })
        .collect()
}

fn criterion_gp(c: &mut Criterion) {
    let dims = [2, 5];
    let nts = [50, 100];

    let mut group = c.benchmark_group("gp");
    group.sample_size(10);
    for (dim, nt) in dims.into_iter().zip(nts) {
        let lim = array![[-600., 600.]];
        let xlimits = lim.broadcast((dim, 2)).unwrap();
        let rng = Xoshiro256Plus::seed_from_u64(42);
        let xt = Lhs::new(&xlimits).with_rng(rng).sample(nt);
        let yt = griewank(&xt);
        let xtest = Lhs::new(&xlimits)
            .with_rng(Xoshiro256Plus::seed_from_u64(0))
            .sample(100);

        group.bench_function(format!("gp-fit-{dim}-dim-{nt}-obs"), |b| {
            let params = GaussianProcess::params(RbfKernel::new(1., 300.))
                .normalize_output(true)
                .check()
                .expect("valid params");
            b.iter(|| {
                let mut gp = GaussianProcess::new(params.clone());
                gp.fit(&xt, &yt).expect("GP fit error");
                black_box(gp)
            });
        });

        group.bench_function(format!("gp-tuned-fit-{dim}-dim-{nt}-obs"), |b| {
            let params = GaussianProcess::params(Matern52Kernel::new(1., 300.))
                .normalize_output(true)
                .hyper_tuning(HyperTuning::Optimized {
                    variance_bounds: (1e-2, 1e2),
                    length_scale_bounds: (1., 1e4),
                })
                .check()
                .expect("valid params");
            b.iter(|| {
                let mut gp = GaussianProcess::new(params.clone());
                gp.fit(&xt, &yt).expect("GP fit error");
                black_box(gp)
            });
        });

        let mut gp = GaussianProcess::new(
            GaussianProcess::params(RbfKernel::new(1., 300.))
                .normalize_output(true)
                .check()
                .expect("valid params"),
        );
        gp.fit(&xt, &yt).expect("GP fit error");
        group.bench_function(format!("gp-predict-{dim}-dim-{nt}-obs"), |b| {
            b.iter(|| black_box(gp.predict_valvar(&xtest).expect("GP prediction")));
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_gp);
criterion_main!(benches);
