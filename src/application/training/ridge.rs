use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::ridge_regression::{RidgeRegression, RidgeRegressionParameters};

use super::{FitSummary, estimator_err, r_squared, to_matrix};
use crate::domain::errors::ForecastError;

/// Regularized linear regression with an in-sample R² fit score.
pub struct RidgeEstimator {
    alpha: f64,
    model: Option<RidgeRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>>,
}

impl RidgeEstimator {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, model: None }
    }

    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<FitSummary, ForecastError> {
        let matrix = to_matrix(x)?;
        let labels = y.to_vec();
        let params = RidgeRegressionParameters::default().with_alpha(self.alpha);
        let model = RidgeRegression::fit(&matrix, &labels, params).map_err(estimator_err)?;

        // In-sample score; optimistic, but the linear model has no
        // out-of-bag equivalent.
        let fitted = model.predict(&matrix).map_err(estimator_err)?;
        let r2 = r_squared(y, &fitted);

        self.model = Some(model);
        Ok(FitSummary {
            samples: y.len(),
            r2,
        })
    }

    pub fn predict_one(&self, features: &[f64]) -> Result<f64, ForecastError> {
        let model = self.model.as_ref().ok_or_else(|| ForecastError::Estimator {
            reason: "ridge model is not fitted".to_string(),
        })?;
        let matrix = to_matrix(&[features.to_vec()])?;
        let out = model.predict(&matrix).map_err(estimator_err)?;
        out.first()
            .copied()
            .ok_or_else(|| ForecastError::Estimator {
                reason: "ridge model returned no prediction".to_string(),
            })
    }
}
