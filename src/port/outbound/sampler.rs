//! Liquidity sampling port.
//!
//! The sampling layer turns a source, a token pair and an ascending amount
//! grid into cumulative output curves, and reports how much of each native
//! order is still fillable. Implementations typically batch read-only
//! contract calls; the quoting core only consumes the returned values.

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::domain::{Amount, LiquiditySource, MarketSide, SampledCurve, SignedOrder};
use crate::error::Result;

/// One sampling request for a single source.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRequest {
    pub source: LiquiditySource,
    pub side: MarketSide,
    /// Token received by the taker.
    pub maker_token: Address,
    /// Token paid by the taker.
    pub taker_token: Address,
    /// Ascending input checkpoints: taker amounts on a sell, maker amounts
    /// on a buy.
    pub amounts: Vec<Amount>,
}

/// Samples on-chain liquidity and native order fillability.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the quote service samples every
/// source concurrently.
#[async_trait]
pub trait LiquiditySampler: Send + Sync {
    /// Sampler name for logging.
    fn name(&self) -> &'static str;

    /// Sample every route this source offers for the request.
    ///
    /// Each returned curve has one point per requested amount, in the same
    /// order. A source may offer several routes (pools, intermediate
    /// tokens), each becoming its own fill chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the source could not be sampled. The quote
    /// service treats this as "no liquidity" for that source only.
    async fn sample(&self, request: &SampleRequest) -> Result<Vec<SampledCurve>>;

    /// Currently fillable amount of each order, in input-token units: taker
    /// amounts on a sell, maker amounts on a buy.
    ///
    /// # Errors
    ///
    /// Returns an error if fillability could not be determined.
    async fn fillable_amounts(
        &self,
        side: MarketSide,
        orders: &[SignedOrder],
    ) -> Result<Vec<Amount>>;
}
