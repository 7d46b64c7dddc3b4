//! Batch gradient descent for linear regression.
//!
//! Every fit prepends a bias column of ones to the feature matrix, starts from all-zero
//! parameters and repeats `θ ← θ − α/m · Xᵀ(Xθ − y)` until its [`StoppingRule`] says stop.
//!
//! # Example
//!
//! ```
//! use linfit::{solve_iterations, Tensor};
//!
//! let x = Tensor::column(vec![2.0, 3.0]);
//! let y = Tensor::column(vec![4.0, 6.0]);
//!
//! let model = solve_iterations(&x, &y, 0.01, 20_000).unwrap();
//! assert!((model.predict(&[3.5]).unwrap() - 7.0).abs() < 0.1);
//! ```

use crate::cost::{cost_of_residual, descent_step, residual};
use crate::error::{Error, Result};
use crate::model::LinearModel;
use crate::observer::{LogObserver, Observer};
use crate::stopping::{CostThreshold, FixedIterations, Progress, StoppingRule};
use crate::tensor::Tensor;

/// Threshold-mode fits log every this many updates.
const THRESHOLD_LOG_PERIOD: usize = 100;

/// Prepends a column of ones to a bias-free feature matrix, producing the design matrix.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if `x` is not a matrix.
pub fn add_bias_column(x: &Tensor<f64>) -> Result<Tensor<f64>> {
    if x.rank() != 2 {
        return Err(Error::DimensionMismatch {
            op: "add_bias_column",
            left: x.shape().to_vec(),
            right: vec![x.rows(), x.cols()],
        });
    }
    Tensor::ones(vec![x.rows(), 1]).concat(x, 1)
}

/// Gradient descent configuration.
///
/// The learning rate is not validated; a rate too large for the data makes the cost
/// grow instead of shrink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDescent {
    alpha: f64,
    divergence_tolerance: Option<f64>,
}

/// Outcome of [`GradientDescent::fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct Fit {
    model: LinearModel,
    iterations: usize,
    cost: f64,
}

impl Fit {
    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn into_model(self) -> LinearModel {
        self.model
    }

    /// Number of updates performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Cost of the final parameters on the training data.
    pub fn cost(&self) -> f64 {
        self.cost
    }
}

impl GradientDescent {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            divergence_tolerance: None,
        }
    }

    /// Fails the fit with [`Error::Diverged`] as soon as an update raises the cost by more
    /// than `tolerance` or makes it non-finite.
    ///
    /// Without this check a diverging fit silently returns a poor model.
    pub fn with_divergence_check(mut self, tolerance: f64) -> Self {
        self.divergence_tolerance = Some(tolerance);
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Fits a model to the bias-free features `x` and the targets `y`.
    ///
    /// `y` may be a vector or an `n x 1` column. The rule is consulted before every
    /// update and the observer is called after every update.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if `x` is not a matrix, `y` is not a column, or their
    ///   row counts differ.
    /// - [`Error::EmptyDataset`] if `x` has no rows.
    /// - [`Error::Diverged`] if the divergence check is enabled and trips.
    pub fn fit<R, O>(
        &self,
        x: &Tensor<f64>,
        y: &Tensor<f64>,
        mut rule: R,
        observer: &mut O,
    ) -> Result<Fit>
    where
        R: StoppingRule,
        O: Observer + ?Sized,
    {
        let y = y.clone().into_column()?;
        let design = add_bias_column(x)?;
        if design.rows() != y.rows() {
            return Err(Error::DimensionMismatch {
                op: "fit",
                left: x.shape().to_vec(),
                right: y.shape().to_vec(),
            });
        }
        if design.rows() == 0 {
            return Err(Error::EmptyDataset);
        }

        let design_t = design.clone().transpose();
        let mut theta = Tensor::zeros(vec![design.cols(), 1]);
        let mut errors = residual(&theta, &design, &y)?;
        let mut progress = Progress::start(cost_of_residual(&errors));

        while rule.should_continue(&progress) {
            let step = descent_step(&design_t, &errors, self.alpha)?;
            theta = theta.sub(&step)?;
            errors = residual(&theta, &design, &y)?;
            progress = progress.advance(cost_of_residual(&errors));

            if let Some(tolerance) = self.divergence_tolerance {
                check_divergence(&progress, tolerance)?;
            }
            observer.on_iteration(&progress, theta.data());
        }

        log::debug!(
            "performed {} iterations of gradient descent, final cost {}",
            progress.iterations,
            progress.cost
        );

        Ok(Fit {
            model: LinearModel::new(theta.to_vec()),
            iterations: progress.iterations,
            cost: progress.cost,
        })
    }
}

fn check_divergence(progress: &Progress, tolerance: f64) -> Result<()> {
    if progress.cost.is_finite() && progress.cost <= progress.previous_cost + tolerance {
        return Ok(());
    }

    log::warn!(
        "cost rose from {} to {} at iteration {}",
        progress.previous_cost,
        progress.cost,
        progress.iterations
    );
    Err(Error::Diverged {
        iteration: progress.iterations,
        previous_cost: progress.previous_cost,
        cost: progress.cost,
    })
}

/// Fits a model with exactly `iterations` updates of gradient descent.
///
/// Progress is logged at `debug` level every tenth of the run.
///
/// # Errors
///
/// See [`GradientDescent::fit`].
pub fn solve_iterations(
    x: &Tensor<f64>,
    y: &Tensor<f64>,
    alpha: f64,
    iterations: usize,
) -> Result<LinearModel> {
    let mut observer = LogObserver::every(iterations / 10);
    GradientDescent::new(alpha)
        .fit(x, y, FixedIterations::new(iterations), &mut observer)
        .map(Fit::into_model)
}

/// Fits a model by running updates until one lowers the cost by `threshold` or less.
///
/// At least one update always runs. Termination is not guaranteed for every learning
/// rate; use [`GradientDescent::fit`] with a [`capped`](StoppingRule::capped) rule to bound it.
///
/// # Errors
///
/// See [`GradientDescent::fit`].
pub fn solve_threshold(
    x: &Tensor<f64>,
    y: &Tensor<f64>,
    alpha: f64,
    threshold: f64,
) -> Result<LinearModel> {
    let mut observer = LogObserver::every(THRESHOLD_LOG_PERIOD);
    GradientDescent::new(alpha)
        .fit(x, y, CostThreshold::new(threshold), &mut observer)
        .map(Fit::into_model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::Silent;

    #[test]
    fn test_add_bias_column() {
        let x = Tensor::from_rows(&[vec![2.0, 5.0], vec![3.0, 7.0]]).unwrap();
        let design = add_bias_column(&x).unwrap();

        assert_eq!(
            Tensor::from_rows(&[vec![1.0, 2.0, 5.0], vec![1.0, 3.0, 7.0]]).unwrap(),
            design
        );
        assert!(add_bias_column(&Tensor::vector(vec![1.0, 2.0])).is_err());
    }

    #[test]
    fn test_first_update_from_zero() {
        let x = Tensor::column(vec![2.0, 3.0]);
        let y = Tensor::column(vec![4.0, 6.0]);

        let fit = GradientDescent::new(1.0)
            .fit(&x, &y, FixedIterations::new(1), &mut Silent)
            .unwrap();

        assert_eq!(&[5.0, 13.0], fit.model().parameters());
        assert_eq!(1, fit.iterations());
    }

    #[test]
    fn test_divergence_check() {
        let x = Tensor::column(vec![2.0, 3.0]);
        let y = Tensor::column(vec![4.0, 6.0]);

        let res = GradientDescent::new(1.0)
            .with_divergence_check(0.0)
            .fit(&x, &y, FixedIterations::new(10), &mut Silent);

        match res {
            Err(Error::Diverged {
                iteration,
                previous_cost,
                cost,
            }) => {
                assert_eq!(1, iteration);
                assert_eq!(13.0, previous_cost);
                assert_eq!(543.25, cost);
            }
            other => panic!("expected divergence, got {:?}", other),
        }
    }

    #[test]
    fn test_divergence_check_passes_converging_fit() {
        let x = Tensor::column(vec![2.0, 3.0]);
        let y = Tensor::column(vec![4.0, 6.0]);

        let fit = GradientDescent::new(0.01)
            .with_divergence_check(0.0)
            .fit(&x, &y, FixedIterations::new(100), &mut Silent)
            .unwrap();
        assert_eq!(100, fit.iterations());
    }
}
