use crate::errors::{EgoError, Result};
use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2, Zip};

/// Check `xlimits` is a (nx, 2) matrix of finite `[lower, upper]` rows with lower < upper
pub fn check_xlimits(xlimits: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Result<()> {
    if xlimits.ncols() != 2 {
        return Err(EgoError::InvalidBoundsError(format!(
            "bounds should be given as a (nx, 2) matrix, got {:?}",
            xlimits.dim()
        )));
    }
    if xlimits.nrows() == 0 {
        return Err(EgoError::InvalidBoundsError(
            "bounds should specify at least one dimension".to_string(),
        ));
    }
    for (i, row) in xlimits.rows().into_iter().enumerate() {
        let (lo, up) = (row[0], row[1]);
        if !(lo.is_finite() && up.is_finite() && lo < up) {
            return Err(EgoError::InvalidBoundsError(format!(
                "dimension {i}: lower bound should be less than upper bound, got [{lo}, {up}]"
            )));
        }
    }
    Ok(())
}

/// Project `x` onto the box given by `xlimits`
pub fn clip(
    x: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    xlimits: &ArrayBase<impl Data<Elem = f64>, Ix2>,
) -> Array1<f64> {
    let mut clipped = x.to_owned();
    Zip::from(&mut clipped)
        .and(xlimits.rows())
        .for_each(|v, limits| *v = v.clamp(limits[0], limits[1]));
    clipped
}
