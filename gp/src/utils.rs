use linfa::Float;
use ndarray::{ArrayBase, Data, Ix1};

/// Conversion used to talk to the optimizer which works in f64
#[inline]
pub(crate) fn to_f64<F: Float>(v: F) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}

/// Mean and standard deviation (ddof = 0) of `y`, the standard deviation
/// being replaced by 1 when `y` is constant.
pub(crate) fn mean_std<F: Float>(y: &ArrayBase<impl Data<Elem = F>, Ix1>) -> (F, F) {
    let mean = y.mean().unwrap_or_else(F::zero);
    let std = y.std(F::zero());
    if std > F::zero() {
        (mean, std)
    } else {
        (mean, F::one())
    }
}
