//! Liquidity source listing.

use tabled::{Table, Tabled};

use crate::cli::output;
use crate::domain::{LiquiditySource, MarketSide, SourceFilters};
use crate::error::Result;
use crate::infrastructure::config::Config;

#[derive(Tabled)]
struct SourceRow {
    #[tabled(rename = "Source")]
    name: &'static str,
    #[tabled(rename = "Flag")]
    flag: String,
    #[tabled(rename = "Multi-hop Conflict")]
    conflicts: &'static str,
    #[tabled(rename = "Buys")]
    buys: &'static str,
    #[tabled(rename = "Allowed")]
    allowed: &'static str,
}

const fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// List every source and whether the configured filters allow it on `side`.
pub fn execute(config: &Config, side: MarketSide) -> Result<()> {
    let filters = SourceFilters::for_side(side).merge(&config.quote.filters());
    let rows: Vec<SourceRow> = LiquiditySource::ALL
        .into_iter()
        .map(|source| SourceRow {
            name: source.name(),
            flag: format!("{:#x}", source.flags().bits()),
            conflicts: yes_no(source.conflicts_with_multi_hop()),
            buys: yes_no(source.supports_buys()),
            allowed: yes_no(filters.is_allowed(source)),
        })
        .collect();

    output::section(&format!("Liquidity sources ({side})"));
    output::table(&Table::new(rows).to_string());
    output::note("Filters come from [quote] excluded_sources and included_sources.");
    Ok(())
}
