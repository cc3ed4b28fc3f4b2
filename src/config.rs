//! Configuration module
//!
//! Loads and validates the TOML configuration file.
//!
//! # Example
//!
//! ```no_run
//! use quarry::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("quarry.toml")).unwrap();
//! println!("Database: {}", config.engine.database_path);
//! ```

use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    pub fetcher: FetcherConfig,
}

/// Engine behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Path to the SQLite store
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// URL seeded into an empty frontier
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum crawl steps per invocation (0 = unbounded)
    #[serde(rename = "max-steps", default)]
    pub max_steps: u64,
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Loads and parses a configuration file from the given path
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Validates a parsed configuration
fn validate(config: &Config) -> ConfigResult<()> {
    if config.engine.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "engine.database-path must not be empty".to_string(),
        ));
    }

    let seed = url::Url::parse(&config.engine.seed_url)
        .map_err(|e| ConfigError::Validation(format!("engine.seed-url is invalid: {}", e)))?;
    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "engine.seed-url must be http or https, got: {}",
            seed.scheme()
        )));
    }

    if config.fetcher.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "fetcher.user-agent must not be empty".to_string(),
        ));
    }

    if config.fetcher.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetcher.timeout-secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
