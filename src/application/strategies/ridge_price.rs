use rand::rngs::StdRng;
use tracing::debug;

use super::{FitOutcome, ForecastStrategy, StepForecast};
use crate::application::features::{FeatureBuilder, FeatureTable, PriceFeatureBuilder};
use crate::application::training::RidgeEstimator;
use crate::domain::errors::ForecastError;

const RIDGE_ALPHA: f64 = 1.0;
const MIN_TRAINING_ROWS: usize = 20;

/// Absolute-price strategy: ridge regression over lagged closes, constant
/// confidence across the rollout.
pub struct PriceRidgeStrategy {
    builder: PriceFeatureBuilder,
    estimator: RidgeEstimator,
}

impl PriceRidgeStrategy {
    pub fn new() -> Self {
        Self {
            builder: PriceFeatureBuilder,
            estimator: RidgeEstimator::new(RIDGE_ALPHA),
        }
    }
}

impl Default for PriceRidgeStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastStrategy for PriceRidgeStrategy {
    fn version(&self) -> &'static str {
        "ridge_v1"
    }

    fn min_training_rows(&self) -> usize {
        MIN_TRAINING_ROWS
    }

    fn builder(&self) -> &dyn FeatureBuilder {
        &self.builder
    }

    fn fit(&mut self, table: &FeatureTable) -> Result<FitOutcome, ForecastError> {
        let features = table.feature_names(self.builder.target());
        let (x, y) = table.cleaned(&features, self.builder.target());
        if y.len() < self.min_training_rows() {
            return Err(ForecastError::InsufficientData {
                needed: self.min_training_rows(),
                got: y.len(),
            });
        }

        let summary = self.estimator.fit(&x, &y)?;
        debug!(samples = summary.samples, r2 = summary.r2, "ridge fit");
        Ok(FitOutcome {
            confidence: summary.r2.clamp(0.0, 1.0),
            samples: summary.samples,
            feature_names: features,
        })
    }

    fn predict_step(
        &self,
        latest: &[f64],
        last_close: f64,
        mean_return: f64,
        _rng: &mut StdRng,
    ) -> Result<StepForecast, ForecastError> {
        if latest.iter().any(|v| v.is_nan()) {
            // Rolling windows eroded by synthetic bars; fall back to the
            // historical mean daily return.
            return Ok(StepForecast {
                close: last_close * (1.0 + mean_return),
                day_return: mean_return,
            });
        }

        let close = self.estimator.predict_one(latest)?;
        let day_return = if last_close != 0.0 {
            close / last_close - 1.0
        } else {
            0.0
        };
        Ok(StepForecast { close, day_return })
    }

    fn step_confidence(&self, base: f64, _step: usize) -> f64 {
        base
    }

    fn synthetic_band(&self, forecast: &StepForecast) -> (f64, f64) {
        (forecast.close, forecast.close)
    }
}
