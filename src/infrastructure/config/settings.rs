//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; `FILLROUTE_GAS_PRICE` and
//! `FILLROUTE_RUN_LIMIT` override the file when set.
//!
//! # Example
//!
//! ```no_run
//! use fillroute::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use super::bridges::BridgeConfig;
use super::fees::FeeConfig;
use super::logging::LoggingConfig;
use super::quote::QuoteConfig;
use crate::error::{ConfigError, Result};

/// Largest accepted `num_samples`.
pub const MAX_NUM_SAMPLES: usize = 64;

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Optimizer, sampling and slippage settings.
    #[serde(default)]
    pub quote: QuoteConfig,

    /// Gas price, ETH conversion rates and gas overrides.
    #[serde(default)]
    pub fees: FeeConfig,

    /// On-chain adapter address per bridged source.
    #[serde(default)]
    pub bridges: BridgeConfig,
}

fn env_override<T: FromStr>(name: &'static str) -> std::result::Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                field: name,
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - An environment override does not parse
    /// - Validation fails (e.g., slippage outside `[0, 1)`)
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Some(gas_price) = env_override::<Decimal>("FILLROUTE_GAS_PRICE")? {
            config.fees.gas_price = gas_price;
        }
        if let Some(run_limit) = env_override::<usize>("FILLROUTE_RUN_LIMIT")? {
            config.quote.run_limit = run_limit;
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for an empty log level and
    /// [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "level" }.into());
        }
        if !self.logging.is_known_format() {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: "must be 'pretty' or 'json'".to_string(),
            }
            .into());
        }

        let quote = &self.quote;
        if quote.run_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "run_limit",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if quote.num_samples == 0 || quote.num_samples > MAX_NUM_SAMPLES {
            return Err(ConfigError::InvalidValue {
                field: "num_samples",
                reason: format!("must be between 1 and {MAX_NUM_SAMPLES}"),
            }
            .into());
        }
        if quote.sample_distribution_base <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "sample_distribution_base",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if quote.bridge_slippage < Decimal::ZERO || quote.bridge_slippage >= Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                field: "bridge_slippage",
                reason: "must be in [0, 1)".to_string(),
            }
            .into());
        }
        if quote.max_fallback_slippage < Decimal::ZERO || quote.max_fallback_slippage >= Decimal::ONE
        {
            return Err(ConfigError::InvalidValue {
                field: "max_fallback_slippage",
                reason: "must be in [0, 1)".to_string(),
            }
            .into());
        }
        if quote.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.fees.gas_price < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "gas_price",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        if self.fees.protocol_fee_multiplier < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "protocol_fee_multiplier",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        self.fees.eth_rates()?;
        self.fees.gas_schedule()?;
        self.bridges.registry()?;

        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
