//! Fitted linear model.

use crate::cost;
use crate::error::{Error, Result};
use crate::solver::add_bias_column;
use crate::tensor::Tensor;

/// A linear model `ŷ = θ₀ + θ₁x₁ + ... + θₙxₙ` produced by a completed fit.
///
/// The parameters are fixed at construction; nothing mutates them afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    /// Bias first, then one weight per feature, as a rank-1 tensor.
    theta: Tensor<f64>,
}

impl LinearModel {
    pub(crate) fn new(parameters: Vec<f64>) -> Self {
        log::trace!("model parameters = {:?}", parameters);
        Self {
            theta: Tensor::vector(parameters),
        }
    }

    /// All parameters, bias first.
    pub fn parameters(&self) -> &[f64] {
        self.theta.data()
    }

    pub fn bias(&self) -> f64 {
        self.theta.data()[0]
    }

    pub fn weights(&self) -> &[f64] {
        &self.theta.data()[1..]
    }

    /// Number of features a row passed to [`predict`](LinearModel::predict) must have.
    pub fn n_features(&self) -> usize {
        self.theta.data().len() - 1
    }

    /// Predicts the target for one bias-free feature row.
    ///
    /// The row is augmented with a leading `1.0` and multiplied by the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `features` doesn't have
    /// [`n_features`](LinearModel::n_features) values.
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features() {
            return Err(Error::DimensionMismatch {
                op: "predict",
                left: vec![features.len()],
                right: vec![self.n_features()],
            });
        }

        let mut row = Vec::with_capacity(features.len() + 1);
        row.push(1.0);
        row.extend_from_slice(features);
        Tensor::vector(row).dot(&self.theta)
    }

    /// Cost of the model on a bias-free feature matrix and its targets.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyDataset`] if `x` has no rows.
    /// - [`Error::DimensionMismatch`] if the shapes disagree with each other or the model.
    pub fn cost(&self, x: &Tensor<f64>, y: &Tensor<f64>) -> Result<f64> {
        let design = add_bias_column(x)?;
        let y = y.clone().into_column()?;
        cost::cost(&Tensor::column(self.parameters().to_vec()), &design, &y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_prepends_bias() {
        let model = LinearModel::new(vec![1.5, 2.0, -1.0]);

        assert_eq!(1.5 + 2.0 * 4.0 - 3.0, model.predict(&[4.0, 3.0]).unwrap());
        assert_eq!(1.5, model.bias());
        assert_eq!(&[2.0, -1.0], model.weights());
        assert_eq!(2, model.n_features());
    }

    #[test]
    fn test_predict_wrong_width() {
        let model = LinearModel::new(vec![0.0, 2.0]);

        assert!(model.predict(&[]).is_err());
        assert!(model.predict(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_cost_on_data() {
        let model = LinearModel::new(vec![0.0, 2.0]);
        let x = Tensor::column(vec![2.0, 3.0]);

        assert_eq!(0.0, model.cost(&x, &Tensor::column(vec![4.0, 6.0])).unwrap());
        assert_eq!(0.25, model.cost(&x, &Tensor::vector(vec![4.0, 7.0])).unwrap());
    }
}
