use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Optimization result
#[derive(Clone, Debug)]
pub struct OptimResult {
    /// Optimum x value
    pub x_opt: Array1<f64>,
    /// Optimum y value (e.g. f(x_opt))
    pub y_opt: f64,
    /// History of successive x values
    pub x_doe: Array2<f64>,
    /// History of successive y values (e.g f(x_doe))
    pub y_doe: Array1<f64>,
}

/// Orientation of an acquisition score
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    /// The most promising point has the lowest score
    Minimize,
    /// The most promising point has the highest score
    Maximize,
}

/// Method used to draw the initial design of experiments
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitialSampling {
    /// Maximin Latin hypercube sampling
    #[default]
    Lhs,
    /// Uniform random sampling
    Random,
}

/// An interface for the objective function to be minimized
///
/// The function is called with one point at a time and may fail with any
/// caller defined error which is propagated by the optimizer as is.
pub trait ObjectiveFn {
    /// Evaluate the objective at `x`
    fn evaluate(&mut self, x: &ArrayView1<f64>) -> anyhow::Result<f64>;

    /// Expected input dimension, if known, checked against the bounds before any evaluation
    fn input_dim(&self) -> Option<usize> {
        None
    }
}

impl<T> ObjectiveFn for T
where
    T: FnMut(&ArrayView1<f64>) -> anyhow::Result<f64>,
{
    fn evaluate(&mut self, x: &ArrayView1<f64>) -> anyhow::Result<f64> {
        self(x)
    }
}
