//! Quote service factory.

use std::sync::Arc;
use tracing::debug;

use crate::application::quote::{QuoteOptions, QuoteService};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::outbound::sampler::LiquiditySampler;

/// Build a quote service over `sampler`, priced by the configured fees and
/// settling through the configured bridges.
///
/// # Errors
///
/// Returns a configuration error if rates, gas overrides or bridge
/// addresses do not parse.
pub fn build_quote_service(
    config: &Config,
    sampler: Arc<dyn LiquiditySampler>,
) -> Result<QuoteService> {
    let oracle = config.fees.oracle()?;
    let gas = config.fees.gas_schedule()?;
    let bridges = config.bridges.registry()?;
    debug!(
        sampler = sampler.name(),
        bridges = bridges.len(),
        run_limit = config.quote.run_limit,
        "Building quote service"
    );

    Ok(
        QuoteService::new(sampler, Arc::new(oracle), QuoteOptions::from(&config.quote))
            .with_gas_schedule(gas)
            .with_protocol_fee_multiplier(config.fees.protocol_fee_multiplier)
            .with_bridges(bridges),
    )
}
