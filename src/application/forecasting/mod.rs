use rand::rngs::StdRng;
use rust_decimal::Decimal;
use tracing::debug;

use crate::application::strategies::{ForecastStrategy, StepForecast};
use crate::domain::errors::ForecastError;
use crate::domain::forecast::Prediction;
use crate::domain::market::{Bar, next_business_day};

/// Iterative multi-step rollout: predict one business day, append a synthetic
/// bar built from that prediction, recompute features, repeat.
///
/// The rollout is anchored on the last *historical* date, so the first
/// prediction lands on the first business day after it and the output depends
/// only on the input series, never on wall-clock time. The provider's bars
/// are never mutated; synthetic rows go onto an owned working copy.
pub fn run<S: ForecastStrategy + ?Sized>(
    strategy: &S,
    feature_names: &[String],
    history: &[Bar],
    horizon: usize,
    base_confidence: f64,
    rng: &mut StdRng,
) -> Result<Vec<Prediction>, ForecastError> {
    let Some(last) = history.last() else {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    };

    let mean_return = mean_daily_return(history);
    let mut working: Vec<Bar> = history.to_vec();
    let mut last_date = last.date;
    let mut predictions = Vec::with_capacity(horizon);

    for step in 0..horizon {
        let next_date = next_business_day(last_date);
        let table = strategy.builder().build(&working);
        let latest = table
            .latest_vector(feature_names)
            .ok_or_else(|| ForecastError::Estimator {
                reason: "feature table is missing an expected column".to_string(),
            })?;

        let last_close = working.last().map(Bar::close_f64).unwrap_or(0.0);
        let forecast = strategy.predict_step(&latest, last_close, mean_return, rng)?;
        let confidence = strategy.step_confidence(base_confidence, step);
        debug!(step, date = %next_date, close = forecast.close, confidence, "rollout step");

        predictions.push(Prediction::new(next_date, forecast.close, confidence));
        let synthetic = synthetic_bar(strategy, next_date, &forecast, working.last());
        working.push(synthetic);
        last_date = next_date;
    }
    Ok(predictions)
}

/// A bar standing in for a day that has not happened yet. Volume carries over
/// from the previous bar so the volume signal group (when present) keeps
/// producing defined values.
fn synthetic_bar<S: ForecastStrategy + ?Sized>(
    strategy: &S,
    date: chrono::NaiveDate,
    forecast: &StepForecast,
    previous: Option<&Bar>,
) -> Bar {
    let (high, low) = strategy.synthetic_band(forecast);
    let close = to_decimal(forecast.close);
    Bar {
        date,
        open: Some(close),
        high: Some(to_decimal(high)),
        low: Some(to_decimal(low)),
        close,
        volume: previous.and_then(|b| b.volume),
    }
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or(Decimal::ZERO)
}

/// Mean 1-day return of the provider-supplied history; the fallback return
/// once synthetic appends erode the rolling windows.
fn mean_daily_return(history: &[Bar]) -> f64 {
    let closes: Vec<f64> = history.iter().map(Bar::close_f64).collect();
    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();
    if returns.is_empty() {
        0.0
    } else {
        returns.iter().sum::<f64>() / returns.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Weekday};
    use rand::SeedableRng;
    use rust_decimal::Decimal;

    use crate::application::strategies::PriceRidgeStrategy;
    use crate::domain::market::next_business_day;

    fn business_series(len: usize, start_close: f64, daily_gain: f64) -> Vec<Bar> {
        let mut date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let mut close = start_close;
        let mut bars = Vec::with_capacity(len);
        for _ in 0..len {
            bars.push(Bar::close_only(
                date,
                Decimal::from_f64_retain(close).unwrap(),
            ));
            date = next_business_day(date);
            close += daily_gain;
        }
        bars
    }

    fn run_ridge(history: &[Bar], horizon: usize) -> Vec<Prediction> {
        let mut strategy = PriceRidgeStrategy::new();
        let table = strategy.builder().build(history);
        let outcome = strategy.fit(&table).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        run(
            &strategy,
            &outcome.feature_names,
            history,
            horizon,
            outcome.confidence,
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn test_exactly_horizon_predictions() {
        let history = business_series(60, 100.0, 0.5);
        assert_eq!(run_ridge(&history, 5).len(), 5);
        assert_eq!(run_ridge(&history, 1).len(), 1);
    }

    #[test]
    fn test_dates_increase_and_skip_weekends() {
        let history = business_series(60, 100.0, 0.5);
        let predictions = run_ridge(&history, 10);

        let mut previous = history.last().unwrap().date;
        for p in &predictions {
            assert!(p.target_date > previous);
            assert!(!matches!(
                p.target_date.weekday(),
                Weekday::Sat | Weekday::Sun
            ));
            previous = p.target_date;
        }
    }

    #[test]
    fn test_first_prediction_follows_last_bar() {
        let history = business_series(60, 100.0, 0.5);
        let predictions = run_ridge(&history, 1);
        assert_eq!(
            predictions[0].target_date,
            next_business_day(history.last().unwrap().date)
        );
    }

    #[test]
    fn test_history_is_not_mutated() {
        let history = business_series(60, 100.0, 0.5);
        let before: Vec<_> = history.iter().map(|b| (b.date, b.close)).collect();
        run_ridge(&history, 5);
        let after: Vec<_> = history.iter().map(|b| (b.date, b.close)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_empty_history_fails() {
        let strategy = PriceRidgeStrategy::new();
        let mut rng = StdRng::seed_from_u64(0);
        let err = run(&strategy, &[], &[], 5, 0.5, &mut rng).unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientData { .. }));
    }

    #[test]
    fn test_mean_daily_return() {
        let history = business_series(3, 100.0, 1.0);
        let mean = mean_daily_return(&history);
        // (1/100 + 1/101) / 2
        let expected = (0.01 + 1.0 / 101.0) / 2.0;
        assert!((mean - expected).abs() < 1e-12);
    }
}
