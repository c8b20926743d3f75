use crate::SamplingMethod;
use linfa::Float;
use ndarray::{Array, Array2, ArrayBase, Data, Ix2};
use ndarray_rand::{rand::Rng, rand::SeedableRng, rand_distr::Uniform, RandomExt};
use rand_xoshiro::Xoshiro256Plus;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Uniform random design: each component of each sample is drawn independently
/// within its bounds. No space-filling property is enforced, use [crate::Lhs] for that.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Random<F: Float, R: Rng + Clone> {
    xlimits: Array2<F>,
    rng: R,
}

impl<F: Float> Random<F, Xoshiro256Plus> {
    /// Uniform design over the box `xlimits`, one `[low, high]` row per dimension,
    /// with an entropy-seeded generator.
    ///
    /// ```
    /// use bayesopt_doe::{Random, SamplingMethod};
    /// use ndarray::arr2;
    ///
    /// let x = Random::new(&arr2(&[[0.0, 1.0], [5.0, 10.0]])).sample(4);
    /// assert_eq!(x.dim(), (4, 2));
    /// ```
    pub fn new(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Self {
        Self::new_with_rng(xlimits, Xoshiro256Plus::from_entropy())
    }
}

impl<F: Float, R: Rng + Clone> Random<F, R> {
    /// Uniform design over `xlimits` drawing from `rng`.
    /// The generator is cloned by each call to `sample`, so draws repeat.
    ///
    /// **Panics** when `xlimits` is not a (nx, 2) matrix.
    pub fn new_with_rng(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>, rng: R) -> Self {
        assert_eq!(xlimits.ncols(), 2, "bounds expected as [low, high] rows");
        Random {
            xlimits: xlimits.to_owned(),
            rng,
        }
    }

    /// Same design drawing from another generator
    pub fn with_rng<R2: Rng + Clone>(self, rng: R2) -> Random<F, R2> {
        Random::new_with_rng(&self.xlimits, rng)
    }
}

impl<F: Float, R: Rng + Clone> SamplingMethod<F> for Random<F, R> {
    fn sampling_space(&self) -> &Array2<F> {
        &self.xlimits
    }

    fn normalized_sample(&self, ns: usize) -> Array2<F> {
        let shape = (ns, self.xlimits.nrows());
        Array::random_using(shape, Uniform::new(0., 1.), &mut self.rng.clone()).mapv(F::cast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_random_within_bounds() {
        let xlimits = arr2(&[[5., 10.], [0., 1.]]);
        let doe = Random::new(&xlimits)
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .sample(50);
        assert_eq!(doe.dim(), (50, 2));
        for row in doe.rows() {
            assert!((5. ..=10.).contains(&row[0]));
            assert!((0. ..=1.).contains(&row[1]));
        }
    }

    #[test]
    fn test_random_reproducible() {
        let xlimits = arr2(&[[-2., 2.], [-2., 2.], [0., 3.]]);
        let rng = Xoshiro256Plus::seed_from_u64(7);
        let doe1 = Random::new_with_rng(&xlimits, rng.clone()).sample(10);
        let doe2 = Random::new_with_rng(&xlimits, rng).sample(10);
        assert_eq!(doe1, doe2);
    }
}
