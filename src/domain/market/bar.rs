use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ForecastError;

/// One day of OHLCV history for an instrument.
///
/// Only `date` and `close` are guaranteed by the provider. Open/high/low and
/// volume may be missing; the feature builders omit the signal groups that
/// depend on an absent field instead of defaulting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Decimal,
    pub volume: Option<u64>,
}

impl Bar {
    /// A bar carrying only the mandatory fields.
    pub fn close_only(date: NaiveDate, close: Decimal) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }

    /// Close at the f64 statistics boundary.
    pub fn close_f64(&self) -> f64 {
        self.close.to_f64().unwrap_or(0.0)
    }

    pub fn high_f64(&self) -> Option<f64> {
        self.high.and_then(|v| v.to_f64())
    }

    pub fn low_f64(&self) -> Option<f64> {
        self.low.and_then(|v| v.to_f64())
    }

    pub fn volume_f64(&self) -> Option<f64> {
        self.volume.map(|v| v as f64)
    }
}

/// Checks the provider contract: dates strictly ascending, no duplicates.
pub fn validate_ordering(bars: &[Bar]) -> Result<(), ForecastError> {
    for (i, pair) in bars.windows(2).enumerate() {
        if pair[1].date <= pair[0].date {
            return Err(ForecastError::UnorderedHistory { index: i + 1 });
        }
    }
    Ok(())
}
