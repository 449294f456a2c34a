//! Fee and gas oracle ports.

use alloy_primitives::Address;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Amount, FillData, LiquiditySource};
use crate::error::Result;

/// Estimates the flat on-chain cost of settling a fill, in wei.
pub trait FeeEstimator: Send + Sync {
    fn fee(&self, source: LiquiditySource, fill_data: &FillData) -> Amount;
}

impl<F> FeeEstimator for F
where
    F: Fn(LiquiditySource, &FillData) -> Amount + Send + Sync,
{
    fn fee(&self, source: LiquiditySource, fill_data: &FillData) -> Amount {
        self(source, fill_data)
    }
}

/// Fee estimator that charges nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFees;

impl FeeEstimator for NoFees {
    fn fee(&self, _source: LiquiditySource, _fill_data: &FillData) -> Amount {
        Decimal::ZERO
    }
}

/// Supplies gas prices and ETH conversion rates.
#[async_trait]
pub trait FeeOracle: Send + Sync {
    /// Current gas price in wei.
    async fn gas_price(&self) -> Result<Amount>;

    /// Base units of `token` per wei.
    async fn eth_to_token_rate(&self, token: Address) -> Result<Amount>;
}
