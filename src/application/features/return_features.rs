use super::{FeatureBuilder, FeatureTable, pct_change, ratio, rolling_mean, rolling_std};
use crate::domain::market::Bar;

const BASE_COLUMNS: &[&str] = &[
    "return_1d",
    "return_2d",
    "return_3d",
    "return_5d",
    "return_10d",
    "sma_5",
    "sma_10",
    "sma_20",
    "price_to_sma_5",
    "price_to_sma_10",
    "price_to_sma_20",
    "sma_5_10_ratio",
    "sma_5_20_ratio",
    "sma_10_20_ratio",
    "volatility_5",
    "volatility_10",
    "volatility_20",
    "volatility_ratio",
    "return_lag_1",
    "return_lag_2",
    "return_lag_3",
    "return_lag_5",
];

const VOLUME_COLUMNS: &[&str] = &[
    "volume_sma_5",
    "volume_sma_10",
    "volume_ratio_5",
    "volume_ratio_10",
    "volume_change",
];

const RANGE_COLUMNS: &[&str] = &[
    "daily_range",
    "range_sma_5",
    "range_sma_10",
    "close_position",
];

const TARGET: &str = "target_return";

/// Return-based signal set.
///
/// The label is the *next* day's percentage return, never the same-day close,
/// so a fitted model cannot fall back on the degenerate "tomorrow equals
/// today" answer that absolute-price lags invite.
///
/// The volume and high/low signal groups appear only when every bar in the
/// series carries those fields; otherwise the columns are omitted entirely
/// and downstream code derives its feature list from the built table.
#[derive(Debug, Clone, Default)]
pub struct ReturnFeatureBuilder;

impl FeatureBuilder for ReturnFeatureBuilder {
    fn build(&self, bars: &[Bar]) -> FeatureTable {
        let has_volume = !bars.is_empty() && bars.iter().all(|b| b.volume.is_some());
        let has_range =
            !bars.is_empty() && bars.iter().all(|b| b.high.is_some() && b.low.is_some());

        let mut columns: Vec<String> = BASE_COLUMNS.iter().map(|s| s.to_string()).collect();
        if has_volume {
            columns.extend(VOLUME_COLUMNS.iter().map(|s| s.to_string()));
        }
        if has_range {
            columns.extend(RANGE_COLUMNS.iter().map(|s| s.to_string()));
        }
        columns.push(TARGET.to_string());
        let mut table = FeatureTable::new(columns);

        let closes: Vec<f64> = bars.iter().map(Bar::close_f64).collect();
        let returns: Vec<f64> = (0..closes.len())
            .map(|i| pct_change(&closes, i, 1))
            .collect();
        let volumes: Vec<f64> = if has_volume {
            bars.iter().map(|b| b.volume_f64().unwrap_or(0.0)).collect()
        } else {
            Vec::new()
        };
        let ranges: Vec<f64> = if has_range {
            bars.iter()
                .map(|b| {
                    let high = b.high_f64().unwrap_or(f64::NAN);
                    let low = b.low_f64().unwrap_or(f64::NAN);
                    ratio(high - low, b.close_f64())
                })
                .collect()
        } else {
            Vec::new()
        };

        for (i, bar) in bars.iter().enumerate() {
            let mut values = Vec::with_capacity(table.columns().len());

            for k in [1, 2, 3, 5, 10] {
                values.push(pct_change(&closes, i, k));
            }

            let smas = [
                rolling_mean(&closes, i, 5),
                rolling_mean(&closes, i, 10),
                rolling_mean(&closes, i, 20),
            ];
            values.extend(smas);
            for sma in smas {
                values.push(ratio(closes[i] - sma, sma));
            }
            values.push(ratio(smas[0], smas[1]));
            values.push(ratio(smas[0], smas[2]));
            values.push(ratio(smas[1], smas[2]));

            let vol_5 = rolling_std(&returns, i, 5);
            let vol_20 = rolling_std(&returns, i, 20);
            values.push(vol_5);
            values.push(rolling_std(&returns, i, 10));
            values.push(vol_20);
            values.push(ratio(vol_5, vol_20));

            for k in [1, 2, 3, 5] {
                values.push(if i >= k { returns[i - k] } else { f64::NAN });
            }

            if has_volume {
                let vol_sma_5 = rolling_mean(&volumes, i, 5);
                let vol_sma_10 = rolling_mean(&volumes, i, 10);
                values.push(vol_sma_5);
                values.push(vol_sma_10);
                values.push(ratio(volumes[i], vol_sma_5));
                values.push(ratio(volumes[i], vol_sma_10));
                values.push(pct_change(&volumes, i, 1));
            }

            if has_range {
                values.push(ranges[i]);
                values.push(rolling_mean(&ranges, i, 5));
                values.push(rolling_mean(&ranges, i, 10));
                values.push(close_position(bar));
            }

            // Strictly future-looking label, undefined on the last row.
            values.push(if i + 1 < closes.len() {
                pct_change(&closes, i + 1, 1)
            } else {
                f64::NAN
            });

            table.push(bar.date, values);
        }
        table
    }

    fn target(&self) -> &'static str {
        TARGET
    }

    fn max_window(&self) -> usize {
        20
    }
}

/// Close's relative position inside the day's high-low band, clamped to 0.5
/// when the range collapses to zero.
fn close_position(bar: &Bar) -> f64 {
    let (Some(high), Some(low)) = (bar.high_f64(), bar.low_f64()) else {
        return f64::NAN;
    };
    let range = high - low;
    if range == 0.0 {
        0.5
    } else {
        (bar.close_f64() - low) / range
    }
}
