//! Gas and fee configuration.

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::adapter::outbound::StaticFeeOracle;
use crate::application::gas::{GasSchedule, DEFAULT_PROTOCOL_FEE_MULTIPLIER};
use crate::domain::LiquiditySource;
use crate::error::ConfigError;

/// `[fees]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct FeeConfig {
    /// Gas price in wei.
    #[serde(default = "default_gas_price")]
    pub gas_price: Decimal,
    #[serde(default = "default_protocol_fee_multiplier")]
    pub protocol_fee_multiplier: Decimal,
    /// Token address to base units per wei.
    #[serde(default)]
    pub eth_rates: HashMap<String, Decimal>,
    /// Source name to gas estimate.
    #[serde(default)]
    pub gas_schedule: HashMap<String, u64>,
}

fn default_gas_price() -> Decimal {
    Decimal::from(50_000_000_000u64) // 50 gwei
}

fn default_protocol_fee_multiplier() -> Decimal {
    Decimal::from(DEFAULT_PROTOCOL_FEE_MULTIPLIER)
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            gas_price: default_gas_price(),
            protocol_fee_multiplier: default_protocol_fee_multiplier(),
            eth_rates: HashMap::new(),
            gas_schedule: HashMap::new(),
        }
    }
}

impl FeeConfig {
    /// Parsed ETH conversion rates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a malformed address or a
    /// negative rate.
    pub fn eth_rates(&self) -> Result<HashMap<Address, Decimal>, ConfigError> {
        self.eth_rates
            .iter()
            .map(|(token, rate)| {
                let address = token.parse::<Address>().map_err(|e| ConfigError::InvalidValue {
                    field: "eth_rates",
                    reason: format!("{token}: {e}"),
                })?;
                if *rate < Decimal::ZERO {
                    return Err(ConfigError::InvalidValue {
                        field: "eth_rates",
                        reason: format!("{token}: rate must be 0 or greater"),
                    });
                }
                Ok((address, *rate))
            })
            .collect()
    }

    /// Default gas schedule with the configured overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown source name.
    pub fn gas_schedule(&self) -> Result<GasSchedule, ConfigError> {
        let overrides = self
            .gas_schedule
            .iter()
            .map(|(name, gas)| {
                name.parse::<LiquiditySource>()
                    .map(|source| (source, *gas))
                    .map_err(|reason| ConfigError::InvalidValue {
                        field: "gas_schedule",
                        reason,
                    })
            })
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(GasSchedule::new(overrides))
    }

    /// Fee oracle answering with the configured values.
    ///
    /// # Errors
    ///
    /// See [`FeeConfig::eth_rates`].
    pub fn oracle(&self) -> Result<StaticFeeOracle, ConfigError> {
        Ok(self
            .eth_rates()?
            .into_iter()
            .fold(StaticFeeOracle::new(self.gas_price), |oracle, (token, rate)| {
                oracle.with_rate(token, rate)
            }))
    }
}
