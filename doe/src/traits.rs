use linfa::Float;
use ndarray::Array2;

/// A sampling method generates a DoE, a set of points within a box-shaped
/// sample space `[lower_i, upper_i]^nx`, `nx` being the dimension of the points.
///
/// Implementations own their random generator and clone it before drawing,
/// hence sampling twice from the same value gives the same design.
pub trait SamplingMethod<F: Float> {
    /// Sample space as a (nx, 2) matrix, the ith row being the `[lower, upper]`
    /// interval of the ith component.
    fn sampling_space(&self) -> &Array2<F>;

    /// Generates `ns` samples within the unit hypercube `[0., 1.]^nx`
    /// as a (ns, nx) matrix.
    fn normalized_sample(&self, ns: usize) -> Array2<F>;

    /// Generates `ns` samples within the sample space as a (ns, nx) matrix.
    fn sample(&self, ns: usize) -> Array2<F> {
        let xlimits = self.sampling_space();
        let lower = xlimits.column(0);
        let scaler = &xlimits.column(1) - &lower;
        self.normalized_sample(ns) * scaler + lower
    }
}
