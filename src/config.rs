//! TOML configuration parsing and validation.
//!
//! ```toml
//! [db]
//! path = "./data/itineraries.sqlite"
//!
//! [server]
//! bind = "127.0.0.1:5000"
//!
//! [recommend]
//! price_range = 2000.0
//! max_results = 5
//!
//! [logging]
//! level = "info"
//! ```
//!
//! `[recommend]` and `[logging]` are optional.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use trip_recommender_core::query::DEFAULT_PRICE_RANGE;
use trip_recommender_core::rank::DEFAULT_MAX_RESULTS;
use trip_recommender_core::RecommendParams;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub recommend: RecommendConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecommendConfig {
    #[serde(default = "default_price_range")]
    pub price_range: f64,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            price_range: DEFAULT_PRICE_RANGE,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

fn default_price_range() -> f64 {
    DEFAULT_PRICE_RANGE
}
fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `trip_recommender=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl RecommendConfig {
    pub fn params(&self) -> RecommendParams {
        RecommendParams {
            price_range: self.price_range,
            max_results: self.max_results,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if !config.recommend.price_range.is_finite() || config.recommend.price_range < 0.0 {
        anyhow::bail!("recommend.price_range must be a finite number >= 0");
    }

    if config.recommend.max_results < 1 {
        anyhow::bail!("recommend.max_results must be >= 1");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(())
}
