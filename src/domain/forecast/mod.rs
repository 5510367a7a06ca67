use chrono::NaiveDate;
use serde::Serialize;

/// A single future business-day estimate.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub target_date: NaiveDate,
    pub predicted_close: f64,
    pub confidence: f64,
}

impl Prediction {
    /// Rounds at construction so the serialized output carries 2-decimal
    /// prices and 4-decimal confidences.
    pub fn new(target_date: NaiveDate, predicted_close: f64, confidence: f64) -> Self {
        Self {
            target_date,
            predicted_close: round_to(predicted_close, 2),
            confidence: round_to(confidence, 4),
        }
    }
}

/// Successful pipeline output: the predictions plus run metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub symbol: String,
    pub model_version: String,
    pub historical_days_used: usize,
    pub predictions: Vec<Prediction>,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
