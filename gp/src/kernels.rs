//! A module for the covariance functions (kernels) of the GP model.
//!
//! All kernels are isotropic and stationary: `k(x, y) = σ² · c(‖x − y‖ / ℓ)`
//! where σ² is the signal variance, ℓ the length-scale and `c` a unit correlation
//! function with `c(0) = 1`. The following kernels are implemented:
//! * squared exponential (aka RBF),
//! * absolute exponential,
//! * matern 3/2,
//! * matern 5/2.

use linfa::Float;
use ndarray::{array, Array1, Array2, ArrayBase, Data, Ix1, Ix2};
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// A trait for using a covariance function in GP regression
pub trait Kernel<F: Float>: Clone + Default + fmt::Debug + fmt::Display + Send + Sync {
    /// Signal variance σ²
    fn variance(&self) -> F;

    /// Length-scale ℓ
    fn length_scale(&self) -> F;

    /// A kernel of the same kind with given hyperparameters
    fn with_hyperparameters(&self, variance: F, length_scale: F) -> Self;

    /// Unit correlation given the scaled distance `r = ‖x − y‖ / ℓ`
    fn correlation(&self, r: F) -> F;

    /// Hyperparameters as `[σ², ℓ]`
    fn hyperparameters(&self) -> Array1<F> {
        array![self.variance(), self.length_scale()]
    }

    /// Covariance between two points `x` and `y`
    fn evaluate(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
        y: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> F {
        let sq = x
            .iter()
            .zip(y.iter())
            .fold(F::zero(), |acc, (&a, &b)| acc + (a - b) * (a - b));
        self.variance() * self.correlation(sq.sqrt() / self.length_scale())
    }

    /// Covariance matrix `K_ij = k(xa_i, xb_j)` between rows of `xa` and rows of `xb`
    fn matrix(
        &self,
        xa: &ArrayBase<impl Data<Elem = F>, Ix2>,
        xb: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Array2<F> {
        Array2::from_shape_fn((xa.nrows(), xb.nrows()), |(i, j)| {
            self.evaluate(&xa.row(i), &xb.row(j))
        })
    }
}

macro_rules! declare_kernel {
    ($(#[$meta:meta])* $kernel:ident, $label:literal, |$r:ident| $corr:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq)]
        #[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
        pub struct $kernel<F: Float> {
            variance: F,
            length_scale: F,
        }

        impl<F: Float> $kernel<F> {
            /// Constructor given signal variance σ² and length-scale ℓ
            pub fn new(variance: F, length_scale: F) -> Self {
                $kernel {
                    variance,
                    length_scale,
                }
            }
        }

        impl<F: Float> Default for $kernel<F> {
            fn default() -> Self {
                Self::new(F::one(), F::one())
            }
        }

        impl<F: Float> fmt::Display for $kernel<F> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(
                    f,
                    "{}(variance={}, length_scale={})",
                    $label, self.variance, self.length_scale
                )
            }
        }

        impl<F: Float> Kernel<F> for $kernel<F> {
            fn variance(&self) -> F {
                self.variance
            }

            fn length_scale(&self) -> F {
                self.length_scale
            }

            fn with_hyperparameters(&self, variance: F, length_scale: F) -> Self {
                Self::new(variance, length_scale)
            }

            fn correlation(&self, $r: F) -> F {
                $corr
            }
        }
    };
}

declare_kernel!(
    /// Squared exponential kernel `σ² exp(−r²/2)`
    SquaredExponentialKernel,
    "SquaredExponential",
    |r| F::exp(F::cast(-0.5) * r * r)
);

declare_kernel!(
    /// Absolute exponential kernel `σ² exp(−r)`
    AbsoluteExponentialKernel,
    "AbsoluteExponential",
    |r| F::exp(-r)
);

declare_kernel!(
    /// Matern 3/2 kernel `σ² (1 + √3 r) exp(−√3 r)`
    Matern32Kernel,
    "Matern32",
    |r| {
        let a = F::cast(3.).sqrt() * r;
        (F::one() + a) * F::exp(-a)
    }
);

declare_kernel!(
    /// Matern 5/2 kernel `σ² (1 + √5 r + 5r²/3) exp(−√5 r)`
    Matern52Kernel,
    "Matern52",
    |r| {
        let a = F::cast(5.).sqrt() * r;
        (F::one() + a + a * a / F::cast(3.)) * F::exp(-a)
    }
);

/// Radial basis function kernel, another name for the squared exponential kernel
pub type RbfKernel<F> = SquaredExponentialKernel<F>;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use linfa_linalg::cholesky::*;
    use ndarray::{arr1, arr2};
    use paste::paste;

    #[test]
    fn test_rbf_closed_form() {
        let kernel = RbfKernel::new(2., 0.5);
        let x = arr1(&[0., 1.]);
        let y = arr1(&[1., 2.]);
        // |x - y|^2 = 2, 2 * exp(-2 / (2 * 0.25))
        assert_abs_diff_eq!(kernel.evaluate(&x, &y), 2. * (-4f64).exp(), epsilon = 1e-14);
    }

    #[test]
    fn test_hyperparameters() {
        let kernel = Matern32Kernel::default().with_hyperparameters(3., 0.1);
        assert_abs_diff_eq!(kernel.hyperparameters(), arr1(&[3., 0.1]));
        assert_eq!(
            kernel.to_string(),
            "Matern32(variance=3, length_scale=0.1)"
        );
    }

    macro_rules! test_kernel {
        ($kernel:ident) => {
            paste! {
                #[test]
                fn [<test_ $kernel:snake _properties>]() {
                    let kernel = [<$kernel Kernel>]::new(1.7, 0.8);
                    let x = arr2(&[
                        [0., 0.],
                        [0.1, 0.9],
                        [-1.2, 0.4],
                        [2., -0.5],
                        [0.05, 0.02],
                    ]);

                    for xi in x.rows() {
                        assert_abs_diff_eq!(kernel.evaluate(&xi, &xi), 1.7, epsilon = 1e-14);
                    }

                    let k = kernel.matrix(&x, &x);
                    assert_abs_diff_eq!(k, k.t(), epsilon = 1e-14);
                    assert!(k.iter().all(|&v| v > 0. && v <= 1.7));

                    // distinct points give a positive definite Gram matrix
                    assert!(k.cholesky().is_ok());
                }
            }
        };
    }

    test_kernel!(SquaredExponential);
    test_kernel!(AbsoluteExponential);
    test_kernel!(Matern32);
    test_kernel!(Matern52);
}
