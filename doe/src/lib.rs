/*!
This library implements the Design of Experiments (DoE) methods used to draw the
initial samples of a Bayesian optimization run, mainly the
[Latin Hypercube sampling](https://en.wikipedia.org/wiki/Latin_hypercube_sampling)
method and plain uniform random sampling.

A DoE is a set of points generated within a sample space `xlimits` given
as a 2D ndarray `(nx, 2)` where the ith row holds the lower and upper bounds
of the ith component of the samples `x`.

Example:
```
use bayesopt_doe::{Lhs, LhsKind, Random, SamplingMethod};
use ndarray::arr2;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

// Sample space is [5., 10.] x [0., 1.], samples are 2-dimensional.
let xlimits = arr2(&[[5., 10.], [0., 1.]]);
// Five samples using centered Latin Hypercube sampling
let samples = Lhs::new(&xlimits).kind(LhsKind::Centered).sample(5);
// or uniformly at random with a seeded generator for reproducibility
let samples = Random::new(&xlimits)
    .with_rng(Xoshiro256Plus::seed_from_u64(42))
    .sample(5);
```
*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod lhs;
mod random;
mod traits;
mod utils;

pub use lhs::*;
pub use random::*;
pub use traits::*;
