use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::application::forecasting;
use crate::application::strategies::{
    ForecastStrategy, ModelVariant, PriceRidgeStrategy, ReturnForestStrategy,
};
use crate::domain::errors::ForecastError;
use crate::domain::forecast::ForecastReport;
use crate::domain::market::{Bar, validate_ordering};

/// Minimum raw history length before any feature work starts.
pub const MIN_HISTORY_BARS: usize = 20;
/// Upper bound on the horizon; an iterated rollout degrades quickly beyond a
/// few dozen steps.
pub const MAX_HORIZON: usize = 30;

/// Validates the input, fits the selected strategy and runs the rollout.
///
/// Each call owns its own working state: a fresh strategy and RNG per run,
/// nothing shared across symbols or invocations.
pub struct ForecastPipeline {
    variant: ModelVariant,
    seed: u64,
}

impl ForecastPipeline {
    pub fn new(variant: ModelVariant, seed: u64) -> Self {
        Self { variant, seed }
    }

    pub fn run(
        &self,
        symbol: &str,
        history: &[Bar],
        horizon: usize,
    ) -> Result<ForecastReport, ForecastError> {
        if horizon == 0 || horizon > MAX_HORIZON {
            return Err(ForecastError::InvalidHorizon {
                horizon,
                max: MAX_HORIZON,
            });
        }
        if history.len() < MIN_HISTORY_BARS {
            return Err(ForecastError::InsufficientData {
                needed: MIN_HISTORY_BARS,
                got: history.len(),
            });
        }
        validate_ordering(history)?;

        match self.variant {
            ModelVariant::PriceRidge => {
                self.run_with(PriceRidgeStrategy::new(), symbol, history, horizon)
            }
            ModelVariant::ReturnForest => {
                self.run_with(ReturnForestStrategy::new(self.seed), symbol, history, horizon)
            }
        }
    }

    fn run_with<S: ForecastStrategy>(
        &self,
        mut strategy: S,
        symbol: &str,
        history: &[Bar],
        horizon: usize,
    ) -> Result<ForecastReport, ForecastError> {
        let table = strategy.builder().build(history);
        let outcome = strategy.fit(&table)?;
        info!(
            symbol,
            model = strategy.version(),
            samples = outcome.samples,
            confidence = outcome.confidence,
            "model fitted"
        );

        let mut rng = StdRng::seed_from_u64(self.seed);
        let predictions = forecasting::run(
            &strategy,
            &outcome.feature_names,
            history,
            horizon,
            outcome.confidence,
            &mut rng,
        )?;

        Ok(ForecastReport {
            symbol: symbol.to_string(),
            model_version: strategy.version().to_string(),
            historical_days_used: history.len(),
            predictions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::domain::market::next_business_day;

    fn business_series(len: usize) -> Vec<Bar> {
        let mut date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let mut bars = Vec::with_capacity(len);
        for i in 0..len {
            let close = 100.0 + i as f64 * 0.4;
            bars.push(Bar::close_only(
                date,
                Decimal::from_f64_retain(close).unwrap(),
            ));
            date = next_business_day(date);
        }
        bars
    }

    #[test]
    fn test_horizon_zero_rejected() {
        let pipeline = ForecastPipeline::new(ModelVariant::PriceRidge, 42);
        let err = pipeline.run("AAPL", &business_series(60), 0).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidHorizon { .. }));
    }

    #[test]
    fn test_horizon_above_cap_rejected() {
        let pipeline = ForecastPipeline::new(ModelVariant::PriceRidge, 42);
        let err = pipeline
            .run("AAPL", &business_series(60), MAX_HORIZON + 1)
            .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidHorizon { .. }));
    }

    #[test]
    fn test_short_raw_history_rejected_before_training() {
        let pipeline = ForecastPipeline::new(ModelVariant::PriceRidge, 42);
        let err = pipeline.run("AAPL", &business_series(19), 5).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData { needed: 20, got: 19 }
        ));
    }

    #[test]
    fn test_unordered_history_rejected() {
        let mut history = business_series(60);
        history.swap(10, 11);
        let pipeline = ForecastPipeline::new(ModelVariant::PriceRidge, 42);
        let err = pipeline.run("AAPL", &history, 5).unwrap_err();
        assert!(matches!(err, ForecastError::UnorderedHistory { .. }));
    }

    #[test]
    fn test_report_metadata() {
        let history = business_series(60);
        let pipeline = ForecastPipeline::new(ModelVariant::PriceRidge, 42);
        let report = pipeline.run("aapl", &history, 5).unwrap();

        assert_eq!(report.symbol, "aapl");
        assert_eq!(report.model_version, "ridge_v1");
        assert_eq!(report.historical_days_used, 60);
        assert_eq!(report.predictions.len(), 5);
    }
}
