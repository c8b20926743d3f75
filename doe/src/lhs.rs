use crate::utils::min_pairwise_distance;
use crate::SamplingMethod;
use linfa::Float;
use ndarray::{Array2, ArrayBase, Data, Ix2};
use ndarray_rand::rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Default number of candidate designs drawn by maximin LHS kinds
pub const LHS_MAXIMIN_ITERATIONS: usize = 5;

/// Kinds of Latin Hypercube Design
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum LhsKind {
    /// sample is chosen randomly within its latin hypercube interval
    Classic,
    /// sample is the middle of its latin hypercube interval
    Centered,
    /// best of several classic designs regarding the minimal distance between points
    #[default]
    Maximin,
    /// best of several centered designs regarding the minimal distance between points
    CenteredMaximin,
}

/// The LHS design divides each dimension into `ns` equal strata, `ns` being
/// the number of requested samples, and puts exactly one sample in each stratum
/// of each dimension. The way the point is placed in its stratum depends on [LhsKind].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Lhs<F: Float, R: Rng + Clone> {
    /// Sample space as a (nx, 2) matrix, ith row is [lower_bound, upper_bound] of xi
    xlimits: Array2<F>,
    /// The requested kind of LHS
    kind: LhsKind,
    /// Number of candidate designs for maximin kinds
    n_iter: usize,
    /// Random generator, cloned at each sampling
    rng: R,
}

impl<F: Float> Lhs<F, Xoshiro256Plus> {
    /// Constructor given a sample space as a (nx, 2) matrix \[\[lower bound, upper bound\], ...\]
    ///
    /// ```
    /// use bayesopt_doe::Lhs;
    /// use ndarray::arr2;
    ///
    /// let doe = Lhs::new(&arr2(&[[0.0, 1.0], [5.0, 10.0]]));
    /// ```
    pub fn new(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Self {
        Self::new_with_rng(xlimits, Xoshiro256Plus::from_entropy())
    }
}

impl<F: Float, R: Rng + Clone> Lhs<F, R> {
    /// Constructor given a sample space and a random generator
    ///
    /// **Panics** if `xlimits` has not exactly 2 columns.
    pub fn new_with_rng(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>, rng: R) -> Self {
        if xlimits.ncols() != 2 {
            panic!("xlimits must have 2 columns (lower, upper)");
        }
        Lhs {
            xlimits: xlimits.to_owned(),
            kind: LhsKind::default(),
            n_iter: LHS_MAXIMIN_ITERATIONS,
            rng,
        }
    }

    /// Sets the kind of LHS
    pub fn kind(mut self, kind: LhsKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the number of candidate designs compared by maximin kinds (at least 1)
    pub fn maximin_iterations(mut self, n_iter: usize) -> Self {
        self.n_iter = n_iter.max(1);
        self
    }

    /// Sets the random generator
    pub fn with_rng<R2: Rng + Clone>(self, rng: R2) -> Lhs<F, R2> {
        Lhs {
            xlimits: self.xlimits,
            kind: self.kind,
            n_iter: self.n_iter,
            rng,
        }
    }

    fn stratified(&self, ns: usize, rng: &mut R, centered: bool) -> Array2<f64> {
        let nx = self.xlimits.nrows();
        let mut lhs = Array2::zeros((ns, nx));
        let mut strata: Vec<usize> = (0..ns).collect();
        for mut column in lhs.columns_mut() {
            strata.shuffle(rng);
            for (v, &k) in column.iter_mut().zip(strata.iter()) {
                let offset = if centered { 0.5 } else { rng.gen::<f64>() };
                *v = (k as f64 + offset) / ns as f64;
            }
        }
        lhs
    }

    fn maximin(&self, ns: usize, rng: &mut R, centered: bool) -> Array2<f64> {
        let mut best = self.stratified(ns, rng, centered);
        let mut best_dist = min_pairwise_distance(&best);
        for _ in 1..self.n_iter {
            let candidate = self.stratified(ns, rng, centered);
            let dist = min_pairwise_distance(&candidate);
            if dist > best_dist {
                best = candidate;
                best_dist = dist;
            }
        }
        best
    }
}

impl<F: Float, R: Rng + Clone> SamplingMethod<F> for Lhs<F, R> {
    fn sampling_space(&self) -> &Array2<F> {
        &self.xlimits
    }

    fn normalized_sample(&self, ns: usize) -> Array2<F> {
        let mut rng = self.rng.clone();
        let lhs = match self.kind {
            LhsKind::Classic => self.stratified(ns, &mut rng, false),
            LhsKind::Centered => self.stratified(ns, &mut rng, true),
            LhsKind::Maximin => self.maximin(ns, &mut rng, false),
            LhsKind::CenteredMaximin => self.maximin(ns, &mut rng, true),
        };
        lhs.mapv(F::cast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr2, Axis};

    fn assert_one_per_stratum(doe: &Array2<f64>) {
        let ns = doe.nrows();
        for column in doe.axis_iter(Axis(1)) {
            let mut strata: Vec<usize> = column
                .iter()
                .map(|v| ((v * ns as f64).floor() as usize).min(ns - 1))
                .collect();
            strata.sort_unstable();
            assert_eq!(strata, (0..ns).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_classic_lhs_is_stratified() {
        let xlimits = arr2(&[[0., 1.], [0., 1.], [0., 1.]]);
        let doe = Lhs::new(&xlimits)
            .kind(LhsKind::Classic)
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .sample(10);
        assert_eq!(doe.dim(), (10, 3));
        assert_one_per_stratum(&doe);
    }

    #[test]
    fn test_lhs_within_bounds() {
        let xlimits = arr2(&[[5., 10.], [-2., 2.]]);
        for kind in [
            LhsKind::Classic,
            LhsKind::Centered,
            LhsKind::Maximin,
            LhsKind::CenteredMaximin,
        ] {
            let doe = Lhs::new(&xlimits)
                .kind(kind)
                .with_rng(Xoshiro256Plus::seed_from_u64(0))
                .sample(20);
            for row in doe.rows() {
                assert!((5. ..=10.).contains(&row[0]), "{kind:?}: {row}");
                assert!((-2. ..=2.).contains(&row[1]), "{kind:?}: {row}");
            }
        }
    }

    #[test]
    fn test_centered_lhs() {
        let xlimits = arr2(&[[5., 10.], [0., 1.]]);
        let doe = Lhs::new(&xlimits)
            .kind(LhsKind::Centered)
            .with_rng(Xoshiro256Plus::seed_from_u64(0))
            .sample(5);
        let mut first: Vec<f64> = doe.column(0).to_vec();
        first.sort_by(|a, b| a.total_cmp(b));
        assert_abs_diff_eq!(
            ndarray::Array1::from_vec(first),
            ndarray::array![5.5, 6.5, 7.5, 8.5, 9.5],
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_maximin_lhs_reproducible() {
        let xlimits = arr2(&[[-2., 2.], [-2., 2.]]);
        let lhs = Lhs::new(&xlimits).with_rng(Xoshiro256Plus::seed_from_u64(42));
        let doe1 = lhs.sample(20);
        let doe2 = lhs.sample(20);
        assert_eq!(doe1, doe2);
        assert_one_per_stratum(&lhs.normalized_sample(20));
    }

    #[test]
    fn test_maximin_spreads_points() {
        let xlimits = arr2(&[[0., 1.], [0., 1.]]);
        let rng = Xoshiro256Plus::seed_from_u64(3);
        let classic = Lhs::new_with_rng(&xlimits, rng.clone())
            .kind(LhsKind::Classic)
            .normalized_sample(15);
        let maximin = Lhs::new_with_rng(&xlimits, rng)
            .kind(LhsKind::Maximin)
            .maximin_iterations(10)
            .normalized_sample(15);
        // first maximin candidate is the classic design, it can only get better
        assert!(min_pairwise_distance(&maximin) >= min_pairwise_distance(&classic));
    }
}
