//! Quote service.
//!
//! Runs the one-way quoting pipeline for a single request:
//!
//! ```text
//! validate -> sample (all sources, concurrently) -> fee rates
//!          -> construct fills -> optimize -> materialize -> fallback
//! ```
//!
//! Sampling never feeds back into construction, and a failure of any
//! single source only removes that source from the quote.

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::fills::{create_fill_paths, FeeConversion, FillPathOptions};
use super::gas::{FeeModel, GasSchedule, DEFAULT_PROTOCOL_FEE_MULTIPLIER};
use super::optimizer::{OptimizerConfig, PathOptimizer, DEFAULT_RUN_LIMIT};
use super::orders::{create_orders_from_path, BridgeRegistry, OptimizedOrder, OrderOptions};
use super::sampling::sample_amounts;
use crate::domain::rate::slippage;
use crate::domain::{
    Amount, DomainError, FillGraph, LiquiditySource, MarketSide, NativeOrder, Path,
    SampledCurve, SignedOrder, SourceFilters, SourceFlags,
};
use crate::error::Result;
use crate::port::outbound::fees::FeeOracle;
use crate::port::outbound::sampler::{LiquiditySampler, SampleRequest};

/// Tunables for one quote.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteOptions {
    pub run_limit: usize,
    pub num_samples: usize,
    pub sample_distribution_base: Decimal,
    pub bridge_slippage: Decimal,
    pub max_fallback_slippage: Decimal,
    pub allow_fallback: bool,
    pub filters: SourceFilters,
}

impl Default for QuoteOptions {
    fn default() -> Self {
        Self {
            run_limit: DEFAULT_RUN_LIMIT,
            num_samples: 13,
            sample_distribution_base: Decimal::new(105, 2),
            bridge_slippage: Decimal::new(5, 3),
            max_fallback_slippage: Decimal::new(5, 2),
            allow_fallback: true,
            filters: SourceFilters::default(),
        }
    }
}

/// A request to quote `amount` of input on `side`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub side: MarketSide,
    /// Token the taker receives.
    pub maker_token: Address,
    /// Token the taker pays.
    pub taker_token: Address,
    /// Taker amount on a sell, maker amount on a buy.
    pub amount: Amount,
    #[serde(default)]
    pub native_orders: Vec<SignedOrder>,
}

impl QuoteRequest {
    /// Token the input amount is denominated in.
    #[must_use]
    pub const fn input_token(&self) -> Address {
        match self.side {
            MarketSide::Sell => self.taker_token,
            MarketSide::Buy => self.maker_token,
        }
    }

    /// Token the output amount is denominated in.
    #[must_use]
    pub const fn output_token(&self) -> Address {
        match self.side {
            MarketSide::Sell => self.maker_token,
            MarketSide::Buy => self.taker_token,
        }
    }
}

/// Outcome of a successful quote.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResult {
    pub id: Uuid,
    pub quoted_at: DateTime<Utc>,
    pub side: MarketSide,
    pub target: Amount,
    pub input: Amount,
    pub output: Amount,
    pub adjusted_output: Amount,
    pub source_flags: SourceFlags,
    pub orders: Vec<OptimizedOrder>,
    /// On-chain-only orders to use if the native orders cannot be filled.
    pub fallback_orders: Vec<OptimizedOrder>,
}

impl QuoteResult {
    /// Fraction of the filled input routed through each source.
    #[must_use]
    pub fn source_breakdown(&self) -> BTreeMap<LiquiditySource, Decimal> {
        let mut breakdown = BTreeMap::new();
        if self.input.is_zero() {
            return breakdown;
        }
        for order in &self.orders {
            let fill = order.fill();
            *breakdown.entry(fill.source).or_insert(Decimal::ZERO) += fill.input / self.input;
        }
        breakdown
    }
}

/// Quotes requests against a sampler and a fee oracle.
pub struct QuoteService {
    sampler: Arc<dyn LiquiditySampler>,
    oracle: Arc<dyn FeeOracle>,
    gas: GasSchedule,
    protocol_fee_multiplier: Amount,
    bridges: BridgeRegistry,
    options: QuoteOptions,
}

impl QuoteService {
    #[must_use]
    pub fn new(
        sampler: Arc<dyn LiquiditySampler>,
        oracle: Arc<dyn FeeOracle>,
        options: QuoteOptions,
    ) -> Self {
        Self {
            sampler,
            oracle,
            gas: GasSchedule::default(),
            protocol_fee_multiplier: Decimal::from(DEFAULT_PROTOCOL_FEE_MULTIPLIER),
            bridges: BridgeRegistry::default(),
            options,
        }
    }

    #[must_use]
    pub fn with_gas_schedule(mut self, gas: GasSchedule) -> Self {
        self.gas = gas;
        self
    }

    #[must_use]
    pub fn with_protocol_fee_multiplier(mut self, multiplier: Amount) -> Self {
        self.protocol_fee_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn with_bridges(mut self, bridges: BridgeRegistry) -> Self {
        self.bridges = bridges;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &QuoteOptions {
        &self.options
    }

    /// Quote one request.
    ///
    /// # Errors
    ///
    /// - [`DomainError::UnsupportedAssetProxy`] or
    ///   [`DomainError::OrderPairMismatch`] for unusable native orders.
    /// - [`DomainError::EmptyInput`] when no source returned liquidity and
    ///   no native order is fillable.
    /// - [`DomainError::NoOptimalPath`] or
    ///   [`DomainError::InsufficientLiquidity`] from the optimizer.
    /// - [`DomainError::UnknownBridge`] when a chosen source has no adapter.
    pub async fn quote(&self, request: &QuoteRequest) -> Result<QuoteResult> {
        check_native_orders(request)?;

        let side = request.side;
        let filters = SourceFilters::for_side(side).merge(&self.options.filters);
        let amounts = sample_amounts(
            request.amount,
            self.options.num_samples,
            self.options.sample_distribution_base,
        );

        let sampling = join_all(
            filters
                .sources()
                .into_iter()
                .filter(|source| !source.is_native())
                .map(|source| {
                    self.sample_source(SampleRequest {
                        source,
                        side,
                        maker_token: request.maker_token,
                        taker_token: request.taker_token,
                        amounts: amounts.clone(),
                    })
                }),
        );
        let (sampled, native_orders, (gas_price, conversion)) = tokio::join!(
            sampling,
            self.native_orders(side, &request.native_orders, &filters),
            self.fee_inputs(request),
        );
        let curves: Vec<SampledCurve> = sampled.into_iter().flatten().collect();

        if native_orders.is_empty() && curves.iter().all(SampledCurve::is_empty) {
            return Err(DomainError::EmptyInput.into());
        }

        let fees = FeeModel::new(self.gas.clone(), gas_price, self.protocol_fee_multiplier);
        let graph = create_fill_paths(&FillPathOptions {
            side,
            target: request.amount,
            native_orders: &native_orders,
            curves: &curves,
            conversion,
            fees: &fees,
            filters: &filters,
        });

        let optimizer = PathOptimizer::new(OptimizerConfig {
            run_limit: self.options.run_limit,
        });
        let path = optimizer
            .find_optimal_path(side, request.amount, graph.arena(), graph.chains())
            .await?;

        let order_options = OrderOptions {
            side,
            maker_token: request.maker_token,
            taker_token: request.taker_token,
            bridge_slippage: self.options.bridge_slippage,
            bridges: &self.bridges,
        };
        let orders = create_orders_from_path(&path, graph.arena(), &order_options)?;
        let fallback_orders = self
            .fallback_orders(&optimizer, &graph, &path, &order_options)
            .await?;

        let result = QuoteResult {
            id: Uuid::new_v4(),
            quoted_at: Utc::now(),
            side,
            target: request.amount,
            input: path.input(),
            output: path.output(),
            adjusted_output: path.adjusted_output(),
            source_flags: path.flags(),
            orders,
            fallback_orders,
        };
        info!(
            quote_id = %result.id,
            side = %side,
            target = %result.target,
            output = %result.output,
            orders = result.orders.len(),
            fallback_orders = result.fallback_orders.len(),
            "Quote computed"
        );
        Ok(result)
    }

    async fn sample_source(&self, request: SampleRequest) -> Vec<SampledCurve> {
        match self.sampler.sample(&request).await {
            Ok(curves) => curves,
            Err(e) => {
                warn!(
                    sampler = self.sampler.name(),
                    source = %request.source,
                    error = %e,
                    "Sampling failed; treating source as empty"
                );
                vec![SampledCurve::empty(request.source)]
            }
        }
    }

    async fn native_orders(
        &self,
        side: MarketSide,
        orders: &[SignedOrder],
        filters: &SourceFilters,
    ) -> Vec<NativeOrder> {
        if orders.is_empty() || !filters.is_allowed(LiquiditySource::Native) {
            return Vec::new();
        }
        match self.sampler.fillable_amounts(side, orders).await {
            Ok(fillable) => orders
                .iter()
                .cloned()
                .zip(fillable)
                .map(|(order, amount)| NativeOrder::from_fillable(side, order, amount))
                .collect(),
            Err(e) => {
                warn!(
                    sampler = self.sampler.name(),
                    orders = orders.len(),
                    error = %e,
                    "Fillable lookup failed; ignoring native orders"
                );
                Vec::new()
            }
        }
    }

    /// Gas price and ETH conversion rates; failures price fees at zero.
    async fn fee_inputs(&self, request: &QuoteRequest) -> (Amount, FeeConversion) {
        let (gas_price, output_rate, input_rate) = tokio::join!(
            self.oracle.gas_price(),
            self.oracle.eth_to_token_rate(request.output_token()),
            self.oracle.eth_to_token_rate(request.input_token()),
        );
        let gas_price = gas_price.unwrap_or_else(|e| {
            warn!(error = %e, "Gas price unavailable; fees ignored");
            Decimal::ZERO
        });
        let conversion = FeeConversion {
            eth_to_output_rate: output_rate.unwrap_or_else(|e| {
                debug!(error = %e, token = %request.output_token(), "No ETH rate for output token");
                Decimal::ZERO
            }),
            eth_to_input_rate: input_rate.unwrap_or_else(|e| {
                debug!(error = %e, token = %request.input_token(), "No ETH rate for input token");
                Decimal::ZERO
            }),
        };
        (gas_price, conversion)
    }

    /// On-chain-only orders offered alongside a path that uses native orders.
    async fn fallback_orders(
        &self,
        optimizer: &PathOptimizer,
        graph: &FillGraph,
        path: &Path,
        order_options: &OrderOptions<'_>,
    ) -> Result<Vec<OptimizedOrder>> {
        let arena = graph.arena();
        if !self.options.allow_fallback || !path.uses(arena, LiquiditySource::Native) {
            return Ok(Vec::new());
        }

        let on_chain = graph.chains_without(LiquiditySource::Native);
        let fallback = match optimizer
            .find_optimal_path(path.side(), path.target(), arena, &on_chain)
            .await
        {
            Ok(fallback) if !fallback.is_empty() => fallback,
            Ok(_) => return Ok(Vec::new()),
            Err(e) => {
                debug!(error = %e, "No on-chain fallback path");
                return Ok(Vec::new());
            }
        };

        let native_only = path
            .fills()
            .iter()
            .all(|id| arena[*id].source.is_native());
        let fallback_slippage = slippage(path.adjusted_rate(), fallback.adjusted_rate());
        if !native_only && fallback_slippage > self.options.max_fallback_slippage {
            debug!(slippage = %fallback_slippage, "Fallback path too far from best");
            return Ok(Vec::new());
        }
        Ok(create_orders_from_path(&fallback, arena, order_options)?)
    }
}

fn check_native_orders(request: &QuoteRequest) -> std::result::Result<(), DomainError> {
    for order in &request.native_orders {
        let (maker_token, taker_token) = order.token_pair()?;
        if maker_token != request.maker_token || taker_token != request.taker_token {
            return Err(DomainError::OrderPairMismatch);
        }
    }
    Ok(())
}
