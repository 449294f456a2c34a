//! Handler for the `quote` command.
//!
//! Quotes a JSON fixture against an in-memory [`CurveSampler`], so routes
//! can be explored without a node connection.

use alloy_primitives::U256;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tabled::{Table, Tabled};
use tracing::info;

use crate::adapter::outbound::{CurveSampler, LiquidityCurve};
use crate::application::orders::OptimizedOrder;
use crate::application::quote::{QuoteRequest, QuoteResult};
use crate::cli::{output, QuoteArgs};
use crate::domain::Amount;
use crate::error::{Error, Result};
use crate::infrastructure::config::Config;
use crate::infrastructure::factory::quote::build_quote_service;

/// Remaining fillable taker amount of one native order.
#[derive(Debug, Clone, Deserialize)]
pub struct FillableOverride {
    pub salt: U256,
    pub taker_amount: Amount,
}

/// A quote request plus the liquidity it should be quoted against.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteFixture {
    pub request: QuoteRequest,
    #[serde(default)]
    pub curves: Vec<LiquidityCurve>,
    #[serde(default)]
    pub fillable: Vec<FillableOverride>,
}

impl QuoteFixture {
    /// Sampler answering from this fixture's curves and overrides.
    #[must_use]
    pub fn sampler(&self) -> CurveSampler {
        self.fillable.iter().fold(
            CurveSampler::new(self.curves.clone()),
            |sampler, fillable| sampler.with_fillable(fillable.salt, fillable.taker_amount),
        )
    }
}

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Source")]
    source: &'static str,
    #[tabled(rename = "Input")]
    input: Amount,
    #[tabled(rename = "Output")]
    output: Amount,
    #[tabled(rename = "Maker Amount")]
    maker_amount: Amount,
    #[tabled(rename = "Taker Amount")]
    taker_amount: Amount,
}

fn rows(orders: &[OptimizedOrder]) -> Vec<OrderRow> {
    orders
        .iter()
        .enumerate()
        .map(|(position, order)| OrderRow {
            position: position + 1,
            kind: match order {
                OptimizedOrder::Native { .. } => "native",
                OptimizedOrder::Bridge(_) => "bridge",
            },
            source: order.source().name(),
            input: order.fill().input,
            output: order.fill().output,
            maker_amount: order.maker_asset_amount(),
            taker_amount: order.taker_asset_amount(),
        })
        .collect()
}

/// Execute `quote`.
pub async fn execute(config: &Config, args: &QuoteArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.request)?;
    let fixture: QuoteFixture = serde_json::from_str(&content)?;
    info!(
        path = %args.request.display(),
        curves = fixture.curves.len(),
        native_orders = fixture.request.native_orders.len(),
        "Loaded quote fixture"
    );

    let service = build_quote_service(config, Arc::new(fixture.sampler()))?;
    let timeout_ms = config.quote.timeout_ms;
    let result = tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        service.quote(&fixture.request),
    )
    .await
    .map_err(|_| Error::Timeout(timeout_ms))??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(result: &QuoteResult) {
    output::section("Quote");
    output::key_value("Id", result.id);
    output::key_value("Side", result.side);
    output::key_value("Target", result.target);
    output::key_value("Input", result.input);
    output::key_value("Output", result.output);
    output::key_value("Adjusted output", result.adjusted_output);

    output::section("Orders");
    output::table(&Table::new(rows(&result.orders)).to_string());

    output::section("Sources");
    for (source, share) in result.source_breakdown() {
        output::key_value(source.name(), format!("{:.2}%", share * Decimal::ONE_HUNDRED));
    }

    if !result.fallback_orders.is_empty() {
        output::section("Fallback orders");
        output::table(&Table::new(rows(&result.fallback_orders)).to_string());
    }
}
