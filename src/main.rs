//! pricecast - price forecasting CLI
//!
//! Reads daily OHLCV history for a symbol and prints future business-day
//! price estimates as JSON.
//!
//! # Usage
//! ```sh
//! pricecast AAPL --days 5 --variant forest
//! ```
//!
//! # Environment Variables
//! - `MODEL_VARIANT` - 'ridge' or 'forest' (default: forest)
//! - `FORECAST_HORIZON` - business days to forecast (default: 5)
//! - `FORECAST_SEED` - RNG seed for the ensemble and rollout (default: 42)
//! - `DATA_DIR` - directory holding {SYMBOL}.csv history files (default: data)

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

use pricecast::application::pipeline::ForecastPipeline;
use pricecast::config::{Config, DEFAULT_HISTORY_DAYS};
use pricecast::infrastructure::provider::{CsvHistoryProvider, HistoryProvider};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Stock symbol, e.g. AAPL
    symbol: String,

    /// Business days to forecast
    #[arg(long)]
    days: Option<usize>,

    /// Model variant: 'ridge' or 'forest'
    #[arg(long)]
    variant: Option<String>,

    /// Random seed for the ensemble and rollout
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding {SYMBOL}.csv history files
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays a clean JSON document.
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with(stderr_layer)
        .init();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(days) = args.days {
        config.horizon = days;
    }
    if let Some(raw) = args.variant.as_deref() {
        config.variant = raw.parse()?;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    let symbol = args.symbol.to_uppercase();
    info!(
        symbol,
        variant = ?config.variant,
        horizon = config.horizon,
        "starting forecast"
    );

    let provider = CsvHistoryProvider::new(config.data_dir.clone());
    let pipeline = ForecastPipeline::new(config.variant, config.seed);

    let outcome = provider
        .fetch(&symbol, DEFAULT_HISTORY_DAYS)
        .and_then(|history| pipeline.run(&symbol, &history, config.horizon));

    match outcome {
        Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
        Err(err) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "error": err.to_string() }))?
            );
            std::process::exit(1);
        }
    }
    Ok(())
}
