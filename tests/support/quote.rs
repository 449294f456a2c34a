use std::sync::Arc;

use alloy_primitives::Address;
use async_trait::async_trait;
use fillroute::adapter::outbound::{CurveSampler, StaticFeeOracle};
use fillroute::application::{BridgeRegistry, QuoteOptions, QuoteService};
use fillroute::domain::{Amount, LiquiditySource, MarketSide, SampledCurve, SignedOrder};
use fillroute::error::{Error, Result};
use fillroute::port::outbound::sampler::{LiquiditySampler, SampleRequest};
use rust_decimal::Decimal;

pub const UNISWAP_BRIDGE: Address = Address::new([0xb1; 20]);
pub const ETH2DAI_BRIDGE: Address = Address::new([0xb2; 20]);
pub const BALANCER_BRIDGE: Address = Address::new([0xb3; 20]);

pub fn bridges() -> BridgeRegistry {
    BridgeRegistry::default()
        .with(LiquiditySource::Uniswap, UNISWAP_BRIDGE)
        .with(LiquiditySource::Eth2Dai, ETH2DAI_BRIDGE)
        .with(LiquiditySource::Balancer, BALANCER_BRIDGE)
}

/// A fee-free quote service over `sampler` with the test bridges.
pub fn service(sampler: impl LiquiditySampler + 'static, options: QuoteOptions) -> QuoteService {
    QuoteService::new(
        Arc::new(sampler),
        Arc::new(StaticFeeOracle::new(Decimal::ZERO)),
        options,
    )
    .with_bridges(bridges())
}

/// Samples through an inner [`CurveSampler`] but cannot report native
/// order fillability.
pub struct NoFillableSampler(pub CurveSampler);

#[async_trait]
impl LiquiditySampler for NoFillableSampler {
    fn name(&self) -> &'static str {
        "no-fillable"
    }

    async fn sample(&self, request: &SampleRequest) -> Result<Vec<SampledCurve>> {
        self.0.sample(request).await
    }

    async fn fillable_amounts(
        &self,
        _side: MarketSide,
        _orders: &[SignedOrder],
    ) -> Result<Vec<Amount>> {
        Err(Error::Oracle("order state unavailable".to_string()))
    }
}
