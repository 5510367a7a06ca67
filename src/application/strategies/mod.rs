mod forest_return;
mod ridge_price;

pub use forest_return::ReturnForestStrategy;
pub use ridge_price::PriceRidgeStrategy;

use std::str::FromStr;

use rand::rngs::StdRng;

use crate::application::features::{FeatureBuilder, FeatureTable};
use crate::domain::errors::ForecastError;

/// Which model drives the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelVariant {
    /// Ridge regression on absolute prices (model tag `ridge_v1`).
    PriceRidge,
    /// Bagged tree ensemble on next-day returns (model tag `forest_v1`).
    ReturnForest,
}

impl FromStr for ModelVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ridge" | "price" => Ok(ModelVariant::PriceRidge),
            "forest" | "return" => Ok(ModelVariant::ReturnForest),
            _ => anyhow::bail!("Invalid MODEL_VARIANT: {}. Must be 'ridge' or 'forest'", s),
        }
    }
}

/// Outcome of fitting a strategy on a feature table.
#[derive(Debug)]
pub struct FitOutcome {
    /// Base confidence in [0, 1], already mapped from the raw fit quality.
    pub confidence: f64,
    /// Rows that survived cleaning and entered the fit.
    pub samples: usize,
    /// Feature columns in the exact order the fitted model expects.
    pub feature_names: Vec<String>,
}

/// One rollout step's point estimate.
#[derive(Debug, Clone, Copy)]
pub struct StepForecast {
    pub close: f64,
    pub day_return: f64,
}

/// A feature builder and an estimator bound together with the variant's
/// rollout policy: point prediction, confidence schedule and the shape of the
/// synthetic bar appended after each step.
pub trait ForecastStrategy {
    fn version(&self) -> &'static str;

    /// Minimum usable rows after NaN trimming.
    fn min_training_rows(&self) -> usize;

    fn builder(&self) -> &dyn FeatureBuilder;

    /// Cleans the table, fits the estimator and maps the raw fit quality to
    /// a base confidence.
    fn fit(&mut self, table: &FeatureTable) -> Result<FitOutcome, ForecastError>;

    /// Point estimate from the latest feature vector. `latest` follows the
    /// fitted feature order and may contain NaN, in which case the historical
    /// `mean_return` is used as the predicted return.
    fn predict_step(
        &self,
        latest: &[f64],
        last_close: f64,
        mean_return: f64,
        rng: &mut StdRng,
    ) -> Result<StepForecast, ForecastError>;

    /// Confidence for the 0-indexed rollout step `step`.
    fn step_confidence(&self, base: f64, step: usize) -> f64;

    /// (high, low) band for the synthetic bar appended after a step.
    fn synthetic_band(&self, forecast: &StepForecast) -> (f64, f64);
}
