//! Order materialization.
//!
//! Collapses the winning path into settlement units and turns each into an
//! order: native fills re-emit the caller's signed order untouched, every
//! other source becomes a bridge order whose maker is the source's on-chain
//! adapter and whose asset data carries the ABI-encoded routing payload.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolValue;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::{
    Amount, AssetData, CollapsedFill, DomainError, FillArena, FillData, LiquiditySource,
    MarketSide, Path, SignedOrder,
};

/// Expiration used for synthesized orders (2050-01-01).
pub const INFINITE_TIMESTAMP_SEC: u64 = 2_524_604_400;

/// On-chain adapter address per bridged source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeRegistry {
    adapters: HashMap<LiquiditySource, Address>,
}

impl BridgeRegistry {
    #[must_use]
    pub fn new(adapters: HashMap<LiquiditySource, Address>) -> Self {
        Self { adapters }
    }

    #[must_use]
    pub fn with(mut self, source: LiquiditySource, adapter: Address) -> Self {
        self.adapters.insert(source, adapter);
        self
    }

    /// Adapter address for `source`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownBridge`] if none is configured.
    pub fn get(&self, source: LiquiditySource) -> Result<Address, DomainError> {
        self.adapters
            .get(&source)
            .copied()
            .ok_or(DomainError::UnknownBridge { liquidity: source })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Settings shared by every order of one quote.
#[derive(Debug, Clone, Copy)]
pub struct OrderOptions<'a> {
    pub side: MarketSide,
    pub maker_token: Address,
    pub taker_token: Address,
    /// Fraction shaved off bridge maker amounts (sell) or added to bridge
    /// taker amounts (buy).
    pub bridge_slippage: Decimal,
    pub bridges: &'a BridgeRegistry,
}

/// A synthesized order settled through an on-chain bridge adapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeOrder {
    pub maker_address: Address,
    pub taker_address: Address,
    pub fee_recipient_address: Address,
    pub sender_address: Address,
    pub maker_asset_amount: Amount,
    pub taker_asset_amount: Amount,
    pub fillable_maker_amount: Amount,
    pub fillable_taker_amount: Amount,
    pub maker_fee: Amount,
    pub taker_fee: Amount,
    pub expiration_time_seconds: u64,
    pub salt: U256,
    pub maker_asset_data: AssetData,
    pub taker_asset_data: AssetData,
    pub fill: CollapsedFill,
}

/// One materialized order of a quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptimizedOrder {
    Native {
        order: SignedOrder,
        fill: CollapsedFill,
    },
    Bridge(BridgeOrder),
}

impl OptimizedOrder {
    #[must_use]
    pub fn fill(&self) -> &CollapsedFill {
        match self {
            Self::Native { fill, .. } => fill,
            Self::Bridge(order) => &order.fill,
        }
    }

    #[must_use]
    pub fn source(&self) -> LiquiditySource {
        self.fill().source
    }

    #[must_use]
    pub fn maker_asset_amount(&self) -> Amount {
        match self {
            Self::Native { order, .. } => order.maker_asset_amount,
            Self::Bridge(order) => order.maker_asset_amount,
        }
    }

    #[must_use]
    pub fn taker_asset_amount(&self) -> Amount {
        match self {
            Self::Native { order, .. } => order.taker_asset_amount,
            Self::Bridge(order) => order.taker_asset_amount,
        }
    }
}

/// Materialize every collapsed fill of `path`, in path order.
///
/// # Errors
///
/// - [`DomainError::UnknownBridge`] if a bridged source has no adapter.
/// - [`DomainError::MismatchedFillData`] if a fill's routing data does not
///   fit its source.
pub fn create_orders_from_path(
    path: &Path,
    arena: &FillArena,
    options: &OrderOptions<'_>,
) -> Result<Vec<OptimizedOrder>, DomainError> {
    path.collapse(arena)
        .into_iter()
        .map(|fill| create_order(fill, options))
        .collect()
}

fn create_order(fill: CollapsedFill, options: &OrderOptions<'_>) -> Result<OptimizedOrder, DomainError> {
    if fill.source.is_native() {
        let FillData::Native { order } = fill.fill_data.as_ref() else {
            return Err(DomainError::MismatchedFillData {
                liquidity: fill.source,
            });
        };
        return Ok(OptimizedOrder::Native {
            order: order.order.clone(),
            fill,
        });
    }
    create_bridge_order(fill, options).map(OptimizedOrder::Bridge)
}

/// Synthesize the bridge order for one non-native collapsed fill.
///
/// # Errors
///
/// See [`create_orders_from_path`].
pub fn create_bridge_order(
    fill: CollapsedFill,
    options: &OrderOptions<'_>,
) -> Result<BridgeOrder, DomainError> {
    if !fill.fill_data.matches(fill.source) {
        return Err(DomainError::MismatchedFillData {
            liquidity: fill.source,
        });
    }
    let bridge = options.bridges.get(fill.source)?;
    let bridge_data = encode_bridge_data(
        fill.source,
        &fill.fill_data,
        options.taker_token,
        options.bridges,
    )?;
    let (maker_asset_amount, taker_asset_amount) =
        slipped_amounts(options.side, fill.input, fill.output, options.bridge_slippage);

    Ok(BridgeOrder {
        maker_address: bridge,
        taker_address: Address::ZERO,
        fee_recipient_address: Address::ZERO,
        sender_address: Address::ZERO,
        maker_asset_amount,
        taker_asset_amount,
        fillable_maker_amount: maker_asset_amount,
        fillable_taker_amount: taker_asset_amount,
        maker_fee: Decimal::ZERO,
        taker_fee: Decimal::ZERO,
        expiration_time_seconds: INFINITE_TIMESTAMP_SEC,
        salt: U256::from(rand::random::<u64>()),
        maker_asset_data: AssetData::Erc20Bridge {
            token: options.maker_token,
            bridge,
            bridge_data,
        },
        taker_asset_data: AssetData::erc20(options.taker_token),
        fill,
    })
}

/// Maker and taker amounts of a bridge order with the slippage buffer
/// applied against the taker.
#[must_use]
pub fn slipped_amounts(
    side: MarketSide,
    input: Amount,
    output: Amount,
    slippage: Decimal,
) -> (Amount, Amount) {
    match side {
        MarketSide::Sell => (
            output.saturating_mul(Decimal::ONE - slippage).floor(),
            input.ceil(),
        ),
        MarketSide::Buy => (
            input.floor(),
            output.saturating_mul(Decimal::ONE + slippage).ceil(),
        ),
    }
}

/// ABI-encode the routing payload a bridge adapter expects.
///
/// # Errors
///
/// Fails for native fill data and for multi-hop legs without an adapter.
pub fn encode_bridge_data(
    source: LiquiditySource,
    fill_data: &FillData,
    taker_token: Address,
    bridges: &BridgeRegistry,
) -> Result<Bytes, DomainError> {
    let encoded = match fill_data {
        FillData::Plain => taker_token.abi_encode(),
        FillData::Curve {
            pool,
            exchange_selector,
            from_index,
            to_index,
        } => (
            *pool,
            *exchange_selector,
            U256::from(*from_index),
            U256::from(*to_index),
        )
            .abi_encode_params(),
        FillData::TokenPath { token_path } => token_path.abi_encode(),
        FillData::Pool { pool } => (taker_token, *pool).abi_encode_params(),
        FillData::Bancor { path, network } => (path.clone(), *network).abi_encode_params(),
        FillData::Kyber { hint } => (taker_token, hint.clone()).abi_encode_params(),
        FillData::Dodo { pool, is_sell_base } => {
            (taker_token, *pool, *is_sell_base).abi_encode_params()
        }
        FillData::MultiHop {
            intermediate_token,
            first_hop,
            second_hop,
        } => {
            let first_bridge = bridges.get(first_hop.source)?;
            let first_data =
                encode_bridge_data(first_hop.source, &first_hop.fill_data, taker_token, bridges)?;
            let second_bridge = bridges.get(second_hop.source)?;
            let second_data = encode_bridge_data(
                second_hop.source,
                &second_hop.fill_data,
                *intermediate_token,
                bridges,
            )?;
            (
                *intermediate_token,
                first_bridge,
                first_data,
                second_bridge,
                second_data,
            )
                .abi_encode_params()
        }
        FillData::Native { .. } => {
            return Err(DomainError::MismatchedFillData { liquidity: source });
        }
    };
    Ok(Bytes::from(encoded))
}
