//! Atomic liquidity quanta and the arena that owns them.
//!
//! Fills are created once per quote and never mutated. A fill's parent is a
//! [`FillId`] into the same [`FillArena`], so chains carry no ownership
//! cycles and a path is just a vector of handles.

use alloy_primitives::{Address, Bytes, FixedBytes};
use serde::{Deserialize, Serialize};
use std::ops::Index;
use std::sync::Arc;

use super::money::{scale, Amount, Rate};
use super::order::NativeOrder;
use super::rate::rate;
use super::side::MarketSide;
use super::source::{LiquiditySource, SourceFlags};

/// Source-specific routing data attached to sampled liquidity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FillData {
    /// No routing data beyond the token pair.
    Plain,
    Native {
        order: NativeOrder,
    },
    /// Curve-style stable pools (Curve, Swerve, SnowSwap).
    Curve {
        pool: Address,
        exchange_selector: FixedBytes<4>,
        from_index: u8,
        to_index: u8,
    },
    /// Router token path (UniswapV2, SushiSwap).
    TokenPath {
        token_path: Vec<Address>,
    },
    /// A single pool contract (Balancer, Cream, Mooniswap, liquidity
    /// providers, MultiBridge).
    Pool {
        pool: Address,
    },
    Bancor {
        path: Vec<Address>,
        network: Address,
    },
    Kyber {
        hint: Bytes,
    },
    Dodo {
        pool: Address,
        is_sell_base: bool,
    },
    MultiHop {
        intermediate_token: Address,
        first_hop: Box<HopFillData>,
        second_hop: Box<HopFillData>,
    },
}

/// One leg of a multi-hop route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopFillData {
    pub source: LiquiditySource,
    pub fill_data: FillData,
}

impl FillData {
    /// Whether this routing data is the shape `source` expects.
    #[must_use]
    pub fn matches(&self, source: LiquiditySource) -> bool {
        use LiquiditySource as S;
        match self {
            Self::Plain => matches!(
                source,
                S::Uniswap | S::Eth2Dai | S::MStable | S::Shell | S::Kyber
            ),
            Self::Native { .. } => source == S::Native,
            Self::Curve { .. } => matches!(source, S::Curve | S::Swerve | S::SnowSwap),
            Self::TokenPath { .. } => matches!(source, S::UniswapV2 | S::SushiSwap),
            Self::Pool { .. } => matches!(
                source,
                S::Balancer | S::Cream | S::Mooniswap | S::LiquidityProvider | S::MultiBridge
            ),
            Self::Bancor { .. } => source == S::Bancor,
            Self::Kyber { .. } => source == S::Kyber,
            Self::Dodo { .. } => source == S::Dodo,
            Self::MultiHop {
                first_hop,
                second_hop,
                ..
            } => {
                source == S::MultiHop
                    && first_hop.fill_data.matches(first_hop.source)
                    && second_hop.fill_data.matches(second_hop.source)
            }
        }
    }
}

/// Handle of a fill inside a [`FillArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FillId(usize);

impl FillId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Identifies the chain (one sampled curve, or the native pseudo-chain) a
/// fill was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ChainId(u32);

impl ChainId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// One atomic, non-splittable quantum of liquidity.
#[derive(Debug, Clone)]
pub struct Fill {
    pub chain: ChainId,
    /// Position within the chain.
    pub index: usize,
    /// The fill that must immediately precede this one in any path.
    pub parent: Option<FillId>,
    pub source: LiquiditySource,
    pub flags: SourceFlags,
    pub input: Amount,
    pub output: Amount,
    /// Output after the fee penalty (lower on a sell, higher on a buy).
    pub adjusted_output: Amount,
    pub fill_data: Arc<FillData>,
}

impl Fill {
    /// Difference between adjusted and raw output.
    #[must_use]
    pub fn penalty(&self) -> Amount {
        self.adjusted_output.saturating_sub(self.output)
    }

    #[must_use]
    pub fn adjusted_rate(&self, side: MarketSide) -> Rate {
        rate(side, self.input, self.adjusted_output)
    }

    /// Input, output and adjusted output when at most `remaining` input is
    /// used. The penalty is not interpolated.
    #[must_use]
    pub fn clipped(&self, remaining: Amount) -> ClippedFill {
        if self.input <= remaining {
            return ClippedFill {
                input: self.input,
                output: self.output,
                adjusted_output: self.adjusted_output,
            };
        }
        let output = scale(self.output, remaining, self.input);
        ClippedFill {
            input: remaining,
            output,
            adjusted_output: output.saturating_add(self.penalty()),
        }
    }
}

/// Amounts of a fill after clipping to a remaining input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippedFill {
    pub input: Amount,
    pub output: Amount,
    pub adjusted_output: Amount,
}

/// Request-scoped owner of every fill.
#[derive(Debug, Clone, Default)]
pub struct FillArena {
    fills: Vec<Fill>,
}

impl FillArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fill: Fill) -> FillId {
        self.fills.push(fill);
        FillId(self.fills.len() - 1)
    }

    #[must_use]
    pub fn get(&self, id: FillId) -> Option<&Fill> {
        self.fills.get(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fills.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }
}

impl Index<FillId> for FillArena {
    type Output = Fill;

    fn index(&self, id: FillId) -> &Fill {
        &self.fills[id.0]
    }
}

/// Ordered fills cut from one source curve, or the native pseudo-chain.
#[derive(Debug, Clone)]
pub struct FillChain {
    pub id: ChainId,
    pub source: LiquiditySource,
    pub fills: Vec<FillId>,
}

impl FillChain {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }
}

/// Every fill of a quote plus the chains grouping them.
#[derive(Debug, Clone, Default)]
pub struct FillGraph {
    arena: FillArena,
    chains: Vec<FillChain>,
}

impl FillGraph {
    #[must_use]
    pub fn new(arena: FillArena, chains: Vec<FillChain>) -> Self {
        Self { arena, chains }
    }

    #[must_use]
    pub const fn arena(&self) -> &FillArena {
        &self.arena
    }

    #[must_use]
    pub fn chains(&self) -> &[FillChain] {
        &self.chains
    }

    /// Chains not drawn from `source`.
    #[must_use]
    pub fn chains_without(&self, source: LiquiditySource) -> Vec<FillChain> {
        self.chains
            .iter()
            .filter(|chain| chain.source != source)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.iter().all(FillChain::is_empty)
    }
}
