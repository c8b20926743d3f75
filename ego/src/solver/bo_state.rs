use crate::errors::{EgoError, Result};
use crate::utils::is_improvement;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Phases of an optimization run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Bounds and configuration validated, nothing evaluated yet
    Init,
    /// Evaluation of the initial design of experiments
    InitialSampling,
    /// One point proposed by the acquisition strategy then evaluated per iteration
    SequentialLoop,
    /// Budget exhausted or target reached
    Terminated,
}

/// Maintains the state from iteration to iteration of the
/// [BayesianOptimization](crate::BayesianOptimization) loop.
///
/// Observations only grow, in evaluation order, and the best-so-far point
/// is updated only on strict improvement. NaN objective values are recorded
/// but never become the best.
#[derive(Clone, Debug)]
pub struct BoState {
    pub(crate) phase: Phase,
    pub(crate) iter: usize,
    pub(crate) last_best_iter: usize,
    pub(crate) x_data: Array2<f64>,
    pub(crate) y_data: Array1<f64>,
    pub(crate) best_index: Option<usize>,
}

impl BoState {
    pub(crate) fn new(nx: usize) -> Self {
        BoState {
            phase: Phase::Init,
            iter: 0,
            last_best_iter: 0,
            x_data: Array2::zeros((0, nx)),
            y_data: Array1::zeros(0),
            best_index: None,
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of completed iterations of the sequential loop
    pub fn iterations(&self) -> usize {
        self.iter
    }

    /// Iteration of the last best-so-far update, 0 when found during initial sampling
    pub fn last_best_iter(&self) -> usize {
        self.last_best_iter
    }

    /// Number of objective evaluations so far
    pub fn n_observations(&self) -> usize {
        self.y_data.len()
    }

    /// Evaluated points as a (n, nx) matrix
    pub fn x_data(&self) -> ArrayView2<f64> {
        self.x_data.view()
    }

    /// Objective values (n,)
    pub fn y_data(&self) -> ArrayView1<f64> {
        self.y_data.view()
    }

    /// Index of the best-so-far observation
    pub fn best_index(&self) -> Option<usize> {
        self.best_index
    }

    /// Best-so-far point and objective value
    pub fn best(&self) -> Option<(ArrayView1<f64>, f64)> {
        self.best_index
            .map(|i| (self.x_data.row(i), self.y_data[i]))
    }

    /// Append an observation, returns whether it improves the best-so-far value
    pub(crate) fn add_observation(&mut self, x: &ArrayView1<f64>, y: f64) -> Result<bool> {
        self.x_data
            .push_row(x.view())
            .map_err(|err| EgoError::InvalidValueError(err.to_string()))?;
        self.y_data
            .append(Axis(0), ArrayView1::from(&[y][..]))
            .map_err(|err| EgoError::InvalidValueError(err.to_string()))?;
        let improved = is_improvement(y, self.best().map(|(_, y_best)| y_best));
        if improved {
            self.best_index = Some(self.y_data.len() - 1);
        }
        Ok(improved)
    }

    /// Observations with a finite objective value, used to train the surrogate
    pub(crate) fn finite_observations(&self) -> (Array2<f64>, Array1<f64>) {
        let indices: Vec<usize> = self
            .y_data
            .iter()
            .enumerate()
            .filter(|(_, y)| y.is_finite())
            .map(|(i, _)| i)
            .collect();
        (
            self.x_data.select(Axis(0), &indices),
            self.y_data.select(Axis(0), &indices),
        )
    }
}
