use super::{FeatureBuilder, FeatureTable, rolling_mean, rolling_std};
use crate::domain::market::Bar;

const COLUMNS: &[&str] = &[
    "lag_1",
    "lag_2",
    "lag_3",
    "lag_5",
    "lag_10",
    "rolling_mean_5",
    "rolling_mean_10",
    "rolling_std_5",
    "momentum_5",
    "momentum_10",
    "daily_return",
    "close",
];

/// Absolute-price signal set: the label is the close itself and the signals
/// are lagged closes, rolling close statistics and raw momentum.
#[derive(Debug, Clone, Default)]
pub struct PriceFeatureBuilder;

impl FeatureBuilder for PriceFeatureBuilder {
    fn build(&self, bars: &[Bar]) -> FeatureTable {
        let columns = COLUMNS.iter().map(|s| s.to_string()).collect();
        let mut table = FeatureTable::new(columns);
        let closes: Vec<f64> = bars.iter().map(Bar::close_f64).collect();

        for (i, bar) in bars.iter().enumerate() {
            let lag = |k: usize| if i >= k { closes[i - k] } else { f64::NAN };
            let momentum = |k: usize| {
                if i >= k {
                    closes[i] - closes[i - k]
                } else {
                    f64::NAN
                }
            };
            let daily_return = if i >= 1 && closes[i - 1] != 0.0 {
                (closes[i] - closes[i - 1]) / closes[i - 1]
            } else {
                f64::NAN
            };

            table.push(
                bar.date,
                vec![
                    lag(1),
                    lag(2),
                    lag(3),
                    lag(5),
                    lag(10),
                    rolling_mean(&closes, i, 5),
                    rolling_mean(&closes, i, 10),
                    rolling_std(&closes, i, 5),
                    momentum(5),
                    momentum(10),
                    daily_return,
                    closes[i],
                ],
            );
        }
        table
    }

    fn target(&self) -> &'static str {
        "close"
    }

    fn max_window(&self) -> usize {
        10
    }
}
