use bayesopt_doe::{Lhs, LhsKind, Random, SamplingMethod};
use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::aview1;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn criterion_doe(c: &mut Criterion) {
    let dims = [2, 10];
    let sizes = [20, 100];
    let kinds = [LhsKind::Classic, LhsKind::Centered, LhsKind::Maximin];

    let mut group = c.benchmark_group("doe");
    group.sample_size(10);
    let bounds = aview1(&[0., 1.]);
    let rng = Xoshiro256Plus::seed_from_u64(42);
    for dim in dims {
        let xlimits = bounds.broadcast((dim, 2)).unwrap();
        for size in sizes {
            for kind in kinds {
                group.bench_function(format!("lhs-{kind:?}-{dim}-dim-{size}-size"), |b| {
                    b.iter(|| {
                        std::hint::black_box(
                            Lhs::new(&xlimits)
                                .kind(kind)
                                .with_rng(rng.clone())
                                .sample(size),
                        )
                    });
                });
            }
            group.bench_function(format!("random-{dim}-dim-{size}-size"), |b| {
                b.iter(|| {
                    std::hint::black_box(
                        Random::new(&xlimits).with_rng(rng.clone()).sample(size),
                    )
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, criterion_doe);
criterion_main!(benches);
