//! Mean squared error cost and its gradient.
//!
//! Both functions take the design matrix `x` with its bias column already in place,
//! parameters `theta` as a `(columns x 1)` column and targets `y` as a `(rows x 1)` column.
//!
//! ```text
//! cost(θ)     = 1/(2m) · Σ (Xθ − y)²
//! gradient(θ) = α/m · Xᵀ(Xθ − y)
//! ```

use crate::error::{Error, Result};
use crate::tensor::Tensor;

/// Computes the mean squared error variant `1/(2m) · Σ(Xθ − y)²`.
///
/// The result is non-negative and zero exactly when `Xθ == y` on every row.
///
/// # Errors
///
/// - [`Error::EmptyDataset`] if `x` has no rows.
/// - [`Error::DimensionMismatch`] if the shapes of `theta`, `x` and `y` disagree.
///
/// # Examples
///
/// ```
/// use linfit::{cost, Tensor};
///
/// let x = Tensor::new(vec![1.0, 2.0, 1.0, 3.0], vec![2, 2]).unwrap();
/// let y = Tensor::column(vec![4.0, 6.0]);
///
/// assert_eq!(13.0, cost(&Tensor::zeros(vec![2, 1]), &x, &y).unwrap());
/// assert_eq!(0.0, cost(&Tensor::column(vec![0.0, 2.0]), &x, &y).unwrap());
/// ```
pub fn cost(theta: &Tensor<f64>, x: &Tensor<f64>, y: &Tensor<f64>) -> Result<f64> {
    let errors = residual(theta, x, y)?;
    Ok(cost_of_residual(&errors))
}

/// Computes `α/m · Xᵀ(Xθ − y)`, the amount to subtract from `theta` on one update.
///
/// The result has the same shape as `theta`.
///
/// # Errors
///
/// - [`Error::EmptyDataset`] if `x` has no rows.
/// - [`Error::DimensionMismatch`] if the shapes of `theta`, `x` and `y` disagree.
pub fn gradient(x: &Tensor<f64>, y: &Tensor<f64>, alpha: f64, theta: &Tensor<f64>) -> Result<Tensor<f64>> {
    let errors = residual(theta, x, y)?;
    descent_step(&x.clone().transpose(), &errors, alpha)
}

/// Prediction errors `Xθ − y` for the current parameters.
pub(crate) fn residual(theta: &Tensor<f64>, x: &Tensor<f64>, y: &Tensor<f64>) -> Result<Tensor<f64>> {
    if x.rows() == 0 {
        return Err(Error::EmptyDataset);
    }
    x.matmul(theta)?.sub(y)
}

pub(crate) fn cost_of_residual(errors: &Tensor<f64>) -> f64 {
    let m = errors.rows() as f64;
    errors.apply_uop(|e| e * e).sum() / (2.0 * m)
}

/// Gradient step from precomputed errors, with `x_t` the transposed design matrix.
pub(crate) fn descent_step(x_t: &Tensor<f64>, errors: &Tensor<f64>, alpha: f64) -> Result<Tensor<f64>> {
    let m = errors.rows() as f64;
    Ok(x_t.matmul(errors)?.scale(alpha / m))
}
