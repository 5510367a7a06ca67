mod price_features;
mod return_features;
mod table;

pub use price_features::PriceFeatureBuilder;
pub use return_features::ReturnFeatureBuilder;
pub use table::{FeatureRow, FeatureTable};

use statrs::statistics::{Data, Distribution};

use crate::domain::market::Bar;

/// Turns a chronological bar series into a feature table.
///
/// Implementations are pure: same bars in, same table out, one row per bar.
/// Signals whose trailing window reaches before the series start are NaN and
/// stay in the table; trimming is the trainer's responsibility.
pub trait FeatureBuilder {
    fn build(&self, bars: &[Bar]) -> FeatureTable;

    /// Name of the training label column in the built table.
    fn target(&self) -> &'static str;

    /// Longest trailing window any signal needs before it is defined. After
    /// dropping undefined rows exactly `len - max_window` feature-complete
    /// rows remain.
    fn max_window(&self) -> usize;
}

/// Mean of the trailing `window` values ending at index `end` (inclusive).
/// NaN when there is not enough history or the window contains NaN.
pub(crate) fn rolling_mean(values: &[f64], end: usize, window: usize) -> f64 {
    if end + 1 < window {
        return f64::NAN;
    }
    let slice = &values[end + 1 - window..=end];
    Data::new(slice.to_vec()).mean().unwrap_or(f64::NAN)
}

/// Sample standard deviation over the trailing `window` values ending at
/// index `end` (inclusive), NaN on insufficient history.
pub(crate) fn rolling_std(values: &[f64], end: usize, window: usize) -> f64 {
    if end + 1 < window {
        return f64::NAN;
    }
    let slice = &values[end + 1 - window..=end];
    Data::new(slice.to_vec()).std_dev().unwrap_or(f64::NAN)
}

/// Percentage change over `k` steps: `(v[i] - v[i-k]) / v[i-k]`.
pub(crate) fn pct_change(values: &[f64], i: usize, k: usize) -> f64 {
    if i < k || values[i - k] == 0.0 {
        return f64::NAN;
    }
    (values[i] - values[i - k]) / values[i - k]
}

/// `a / b`, NaN-safe against a zero denominator.
pub(crate) fn ratio(a: f64, b: f64) -> f64 {
    if b == 0.0 { f64::NAN } else { a / b }
}
