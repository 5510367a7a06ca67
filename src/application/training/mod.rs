mod forest;
mod ridge;

pub use forest::ForestEstimator;
pub use ridge::RidgeEstimator;

use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::domain::errors::ForecastError;

/// Outcome of a fit: how many rows entered it and the raw fit-quality score.
/// `r2` is unbounded below; mapping it to a user-facing confidence is the
/// strategy's job.
#[derive(Debug, Clone, Copy)]
pub struct FitSummary {
    pub samples: usize,
    pub r2: f64,
}

/// Coefficient of determination. A zero-variance target scores 1.0 when the
/// residuals are also negligible, otherwise 0.0.
pub(crate) fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len();
    if n == 0 {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = actual.iter().map(|y| (y - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    if ss_tot <= f64::EPSILON {
        return if ss_res < 1e-6 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

pub(crate) fn to_matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>, ForecastError> {
    DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(estimator_err)
}

pub(crate) fn estimator_err<E: std::fmt::Display>(e: E) -> ForecastError {
    ForecastError::Estimator {
        reason: e.to_string(),
    }
}
