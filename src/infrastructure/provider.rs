use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::domain::errors::ForecastError;
use crate::domain::market::Bar;

/// Supplies daily history for a symbol. The pipeline never fetches data on
/// its own; callers construct a provider and hand it in.
pub trait HistoryProvider {
    /// Up to `days` most recent bars, oldest first.
    fn fetch(&self, symbol: &str, days: usize) -> Result<Vec<Bar>, ForecastError>;
}

#[derive(Debug, Deserialize)]
struct CsvBar {
    date: NaiveDate,
    #[serde(default)]
    open: Option<Decimal>,
    #[serde(default)]
    high: Option<Decimal>,
    #[serde(default)]
    low: Option<Decimal>,
    close: Decimal,
    #[serde(default)]
    volume: Option<u64>,
}

/// Reads `{dir}/{SYMBOL}.csv` with a `date,open,high,low,close,volume`
/// header. Empty optional fields stay absent rather than defaulting to zero.
pub struct CsvHistoryProvider {
    dir: PathBuf,
}

impl CsvHistoryProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.to_uppercase()))
    }
}

impl HistoryProvider for CsvHistoryProvider {
    fn fetch(&self, symbol: &str, days: usize) -> Result<Vec<Bar>, ForecastError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(ForecastError::SymbolNotFound {
                symbol: symbol.to_uppercase(),
            });
        }

        let file = File::open(&path).map_err(|e| ForecastError::DataSource {
            reason: format!("{}: {}", path.display(), e),
        })?;
        let mut reader = csv::Reader::from_reader(BufReader::new(file));

        let mut bars = Vec::new();
        for record in reader.deserialize::<CsvBar>() {
            let row = record.map_err(|e| ForecastError::DataSource {
                reason: e.to_string(),
            })?;
            bars.push(Bar {
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        if bars.len() > days {
            bars.drain(..bars.len() - days);
        }
        info!(symbol, rows = bars.len(), "history loaded");
        Ok(bars)
    }
}
