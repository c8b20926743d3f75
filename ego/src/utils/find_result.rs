use ndarray::{ArrayBase, Data, Ix1};

/// Index of the smallest value of `y_data` ignoring NaN values.
///
/// The first index wins on ties, None when no comparable value is found.
pub fn find_best_result_index(y_data: &ArrayBase<impl Data<Elem = f64>, Ix1>) -> Option<usize> {
    y_data
        .iter()
        .enumerate()
        .filter(|(_, y)| !y.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, &y)| match best {
            Some((_, y_best)) if y_best <= y => best,
            _ => Some((i, y)),
        })
        .map(|(i, _)| i)
}

/// Whether `y_new` strictly improves `y_best`, a NaN value never does
pub fn is_improvement(y_new: f64, y_best: Option<f64>) -> bool {
    match y_best {
        _ if y_new.is_nan() => false,
        Some(y_best) => y_new < y_best,
        None => true,
    }
}
