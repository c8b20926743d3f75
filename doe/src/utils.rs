use ndarray::{Array1, ArrayBase, Axis, Data, Ix2};
use ndarray_stats::DeviationExt;

/// Pairwise euclidean distances between the rows of `x`, in condensed form
/// (upper triangle, row major) like scipy's `pdist`.
pub fn pdist(x: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Array1<f64> {
    let n = x.nrows();
    let mut res = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for (i, xi) in x.axis_iter(Axis(0)).enumerate() {
        for xj in x.axis_iter(Axis(0)).skip(i + 1) {
            // shapes are equal, l2_dist can not fail
            res.push(xi.l2_dist(&xj).unwrap_or(f64::NAN));
        }
    }
    Array1::from_vec(res)
}

/// Smallest distance between two rows of `x`, infinite when `x` has less than two rows
pub fn min_pairwise_distance(x: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> f64 {
    pdist(x).fold(f64::INFINITY, |acc, &d| acc.min(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_pdist() {
        let x = arr2(&[[0., 0.], [3., 4.], [0., 1.]]);
        assert_abs_diff_eq!(pdist(&x), arr1(&[5., 1., 18f64.sqrt()]), epsilon = 1e-12);
        assert_abs_diff_eq!(min_pairwise_distance(&x), 1.);
    }

    #[test]
    fn test_min_distance_single_point() {
        let x = arr2(&[[0.5, 0.5]]);
        assert_eq!(pdist(&x).len(), 0);
        assert!(min_pairwise_distance(&x).is_infinite());
    }
}
