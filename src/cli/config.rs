//! Handler for the `config` command group.

use std::path::Path;

use crate::cli::{load_config, output, DEFAULT_CONFIG_PATH};
use crate::error::Result;

/// Execute `config check`.
pub fn execute_check(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    let shown = path.map_or_else(
        || {
            if Path::new(DEFAULT_CONFIG_PATH).exists() {
                DEFAULT_CONFIG_PATH.to_string()
            } else {
                "(defaults)".to_string()
            }
        },
        |path| path.display().to_string(),
    );

    output::section("Configuration");
    output::ok("Configuration is valid");
    output::key_value("Path", shown);

    output::section("Quote");
    output::key_value("Run limit", config.quote.run_limit);
    output::key_value("Samples", config.quote.num_samples);
    output::key_value("Grid base", config.quote.sample_distribution_base);
    output::key_value("Bridge slippage", config.quote.bridge_slippage);
    output::key_value("Fallback", config.quote.allow_fallback);
    output::key_value("Timeout", format!("{} ms", config.quote.timeout_ms));

    output::section("Fees");
    output::key_value("Gas price", config.fees.gas_price);
    output::key_value("ETH rates", config.fees.eth_rates.len());
    output::key_value("Gas overrides", config.fees.gas_schedule.len());
    output::key_value("Bridges", config.bridges.len());
    Ok(())
}
