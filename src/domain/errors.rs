use thiserror::Error;

/// Errors surfaced by the forecasting pipeline and its data provider.
///
/// Everything detected before or during training is returned as a value;
/// nothing here is ever panicked across the public boundary.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Symbol {symbol} not found")]
    SymbolNotFound { symbol: String },

    #[error("Not enough historical data: need at least {needed} usable rows, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Invalid horizon {horizon}: must be between 1 and {max} business days")]
    InvalidHorizon { horizon: usize, max: usize },

    #[error("History is not strictly ordered by date at row {index}")]
    UnorderedHistory { index: usize },

    #[error("Estimator failure: {reason}")]
    Estimator { reason: String },

    #[error("Data source error: {reason}")]
    DataSource { reason: String },
}
