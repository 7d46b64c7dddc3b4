//! Linear regression fitted by batch gradient descent.
//!
//! A fit takes a bias-free feature matrix `x` (one row per sample) and a target column `y`,
//! prepends a column of ones to `x`, and minimises the mean squared error
//!
//! ```text
//! J(θ) = 1/(2m) · Σ (Xθ − y)²
//! ```
//!
//! by repeating `θ ← θ − α/m · Xᵀ(Xθ − y)` from `θ = 0`. Two stopping policies are built in:
//! a fixed number of updates ([`solve_iterations`]) and a minimum cost improvement per
//! update ([`solve_threshold`]). [`GradientDescent::fit`] accepts any [`StoppingRule`] and
//! an [`Observer`] notified after every update.
//!
//! All arithmetic runs on [`Tensor`], a small strided array type.
//!
//! ```
//! use linfit::{solve_threshold, Tensor};
//!
//! let x = Tensor::column(vec![1.0, 2.0, 3.0]);
//! let y = Tensor::column(vec![2.0, 4.0, 6.0]);
//!
//! let model = solve_threshold(&x, &y, 0.01, 1e-9).unwrap();
//! assert!((model.predict(&[4.0]).unwrap() - 8.0).abs() < 0.1);
//! ```

pub mod cost;
pub mod dataset;
pub mod error;
pub mod model;
pub mod observer;
pub mod solver;
pub mod stopping;
pub mod tensor;

pub use cost::{cost, gradient};
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use model::LinearModel;
pub use observer::{CostHistory, LogObserver, Observer, Silent};
pub use solver::{add_bias_column, solve_iterations, solve_threshold, Fit, GradientDescent};
pub use stopping::{Capped, CostThreshold, FixedIterations, Progress, StoppingRule};
pub use tensor::Tensor;
