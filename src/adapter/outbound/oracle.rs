//! Fee oracle backed by configured values.

use alloy_primitives::Address;
use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::Amount;
use crate::error::{Error, Result};
use crate::port::outbound::fees::FeeOracle;

/// Fixed gas price and ETH conversion rates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticFeeOracle {
    gas_price: Amount,
    eth_rates: HashMap<Address, Amount>,
}

impl StaticFeeOracle {
    #[must_use]
    pub fn new(gas_price: Amount) -> Self {
        Self {
            gas_price,
            eth_rates: HashMap::new(),
        }
    }

    /// Set the base units of `token` per wei.
    #[must_use]
    pub fn with_rate(mut self, token: Address, rate: Amount) -> Self {
        self.eth_rates.insert(token, rate);
        self
    }
}

#[async_trait]
impl FeeOracle for StaticFeeOracle {
    async fn gas_price(&self) -> Result<Amount> {
        Ok(self.gas_price)
    }

    async fn eth_to_token_rate(&self, token: Address) -> Result<Amount> {
        self.eth_rates
            .get(&token)
            .copied()
            .ok_or_else(|| Error::Oracle(format!("no ETH rate for {token}")))
    }
}
