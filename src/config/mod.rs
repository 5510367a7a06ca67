//! Configuration for pricecast.
//!
//! Values load from environment variables (a `.env` file is honored at
//! startup) and can be overridden per run by CLI flags.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::application::strategies::ModelVariant;

pub const DEFAULT_HORIZON: usize = 5;
pub const DEFAULT_HISTORY_DAYS: usize = 60;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone)]
pub struct Config {
    pub variant: ModelVariant,
    pub horizon: usize,
    pub seed: u64,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let variant = match env::var("MODEL_VARIANT") {
            Ok(raw) => ModelVariant::from_str(&raw)?,
            Err(_) => ModelVariant::ReturnForest,
        };
        let horizon = parse_env("FORECAST_HORIZON", DEFAULT_HORIZON)?;
        let seed = parse_env("FORECAST_SEED", DEFAULT_SEED)?;
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        Ok(Self {
            variant,
            horizon,
            seed,
            data_dir,
        })
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid {key}: {raw}")),
        Err(_) => Ok(default),
    }
}
