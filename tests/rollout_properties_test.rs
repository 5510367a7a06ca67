use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use pricecast::application::features::{
    FeatureBuilder, PriceFeatureBuilder, ReturnFeatureBuilder,
};
use pricecast::application::pipeline::ForecastPipeline;
use pricecast::application::strategies::ModelVariant;
use pricecast::domain::market::{Bar, next_business_day};

fn dec(v: f64) -> Decimal {
    Decimal::from_f64_retain(v).unwrap()
}

fn noisy_series(len: usize, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
    let mut close = 80.0;
    let mut bars = Vec::with_capacity(len);
    for _ in 0..len {
        let shock = (rng.random::<f64>() - 0.5) * 0.02;
        close *= 1.0 + 0.0005 + shock;
        bars.push(Bar {
            date,
            open: Some(dec(close)),
            high: Some(dec(close * 1.012)),
            low: Some(dec(close * 0.988)),
            close: dec(close),
            volume: Some(500_000),
        });
        date = next_business_day(date);
    }
    bars
}

#[test]
fn test_feature_trim_round_trip_price_builder() {
    let bars = noisy_series(45, 5);
    let builder = PriceFeatureBuilder;
    let table = builder.build(&bars);
    let features = table.feature_names(builder.target());

    assert_eq!(table.len(), bars.len());
    assert_eq!(
        table.complete_rows(&features),
        bars.len() - builder.max_window()
    );
}

#[test]
fn test_feature_trim_round_trip_return_builder() {
    let bars = noisy_series(45, 5);
    let builder = ReturnFeatureBuilder;
    let table = builder.build(&bars);
    let features = table.feature_names(builder.target());

    assert_eq!(table.len(), bars.len());
    assert_eq!(
        table.complete_rows(&features),
        bars.len() - builder.max_window()
    );
}

#[test]
fn test_both_variants_emit_exact_horizon_on_business_days() {
    let history = noisy_series(80, 9);
    for variant in [ModelVariant::PriceRidge, ModelVariant::ReturnForest] {
        let report = ForecastPipeline::new(variant, 42)
            .run("TEST", &history, 10)
            .unwrap();

        assert_eq!(report.predictions.len(), 10);
        let mut previous = history.last().unwrap().date;
        for p in &report.predictions {
            assert!(p.target_date > previous, "dates must strictly increase");
            assert!(
                !matches!(p.target_date.weekday(), Weekday::Sat | Weekday::Sun),
                "{} is a weekend",
                p.target_date
            );
            previous = p.target_date;
        }
    }
}

#[test]
fn test_confidence_always_within_unit_interval() {
    let history = noisy_series(80, 9);
    for variant in [ModelVariant::PriceRidge, ModelVariant::ReturnForest] {
        let report = ForecastPipeline::new(variant, 42)
            .run("TEST", &history, 10)
            .unwrap();
        for p in &report.predictions {
            assert!(
                (0.0..=1.0).contains(&p.confidence),
                "confidence {} out of range",
                p.confidence
            );
        }
    }
}

#[test]
fn test_long_rollout_stays_positive() {
    // 30 steps of compounding synthetic bars must never push the price to
    // zero or below; the forest clamps each step to a 5% move.
    let history = noisy_series(60, 13);
    let report = ForecastPipeline::new(ModelVariant::ReturnForest, 42)
        .run("TEST", &history, 30)
        .unwrap();

    assert_eq!(report.predictions.len(), 30);
    for p in &report.predictions {
        assert!(p.predicted_close > 0.0);
    }
}

#[test]
fn test_no_gap_or_duplicate_dates() {
    let history = noisy_series(80, 9);
    let report = ForecastPipeline::new(ModelVariant::PriceRidge, 42)
        .run("TEST", &history, 10)
        .unwrap();

    let mut expected = history.last().unwrap().date;
    for p in &report.predictions {
        expected = next_business_day(expected);
        assert_eq!(p.target_date, expected);
    }
}
