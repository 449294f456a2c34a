//! Liquidity source registry and source flags.
//!
//! The set of sources is closed: every source-specific behaviour (flags, gas,
//! bridge payloads) is an exhaustive `match` on [`LiquiditySource`], so adding
//! a source fails to compile until every site handles it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// A named source of liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LiquiditySource {
    /// Off-chain signed limit orders supplied by the caller.
    Native = 0,
    Uniswap,
    UniswapV2,
    #[serde(rename = "eth2dai")]
    Eth2Dai,
    Kyber,
    Curve,
    Balancer,
    Bancor,
    #[serde(rename = "mstable")]
    MStable,
    Mooniswap,
    #[serde(rename = "sushiswap")]
    SushiSwap,
    Shell,
    Swerve,
    #[serde(rename = "snowswap")]
    SnowSwap,
    Cream,
    Dodo,
    LiquidityProvider,
    #[serde(rename = "multibridge")]
    MultiBridge,
    /// Two-hop route through an intermediate token.
    #[serde(rename = "multihop")]
    MultiHop,
}

impl LiquiditySource {
    /// Every source, in declaration order.
    pub const ALL: [Self; 19] = [
        Self::Native,
        Self::Uniswap,
        Self::UniswapV2,
        Self::Eth2Dai,
        Self::Kyber,
        Self::Curve,
        Self::Balancer,
        Self::Bancor,
        Self::MStable,
        Self::Mooniswap,
        Self::SushiSwap,
        Self::Shell,
        Self::Swerve,
        Self::SnowSwap,
        Self::Cream,
        Self::Dodo,
        Self::LiquidityProvider,
        Self::MultiBridge,
        Self::MultiHop,
    ];

    /// Stable name used in configuration and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Uniswap => "uniswap",
            Self::UniswapV2 => "uniswap_v2",
            Self::Eth2Dai => "eth2dai",
            Self::Kyber => "kyber",
            Self::Curve => "curve",
            Self::Balancer => "balancer",
            Self::Bancor => "bancor",
            Self::MStable => "mstable",
            Self::Mooniswap => "mooniswap",
            Self::SushiSwap => "sushiswap",
            Self::Shell => "shell",
            Self::Swerve => "swerve",
            Self::SnowSwap => "snowswap",
            Self::Cream => "cream",
            Self::Dodo => "dodo",
            Self::LiquidityProvider => "liquidity_provider",
            Self::MultiBridge => "multibridge",
            Self::MultiHop => "multihop",
        }
    }

    #[must_use]
    pub const fn is_native(self) -> bool {
        matches!(self, Self::Native)
    }

    /// Sources that settle through the same on-chain forwarding state as the
    /// multi-hop aggregator and so cannot share a settlement with it.
    #[must_use]
    pub const fn conflicts_with_multi_hop(self) -> bool {
        matches!(
            self,
            Self::Uniswap | Self::Eth2Dai | Self::Kyber | Self::MultiBridge
        )
    }

    /// Whether the source can quote exact-output (buy) trades.
    #[must_use]
    pub const fn supports_buys(self) -> bool {
        !matches!(self, Self::MultiBridge)
    }

    /// Flags carried by every fill from this source.
    #[must_use]
    pub const fn flags(self) -> SourceFlags {
        let own = SourceFlags::of(self);
        if self.conflicts_with_multi_hop() {
            SourceFlags(own.0 | SourceFlags::CONFLICTS_WITH_MULTI_HOP.0)
        } else {
            own
        }
    }
}

impl fmt::Display for LiquiditySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LiquiditySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|source| source.name() == wanted)
            .ok_or_else(|| format!("unknown liquidity source '{s}'"))
    }
}

/// Fixed-width bitset of source flags.
///
/// Each source owns one bit (its discriminant). Sources that cannot settle
/// alongside the multi-hop aggregator additionally set
/// [`SourceFlags::CONFLICTS_WITH_MULTI_HOP`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceFlags(u64);

impl SourceFlags {
    pub const NONE: Self = Self(0);

    /// Set by every source listed in
    /// [`LiquiditySource::conflicts_with_multi_hop`].
    pub const CONFLICTS_WITH_MULTI_HOP: Self = Self(1 << 63);

    /// The multi-hop aggregator's own bit.
    pub const MULTI_HOP: Self = Self::of(LiquiditySource::MultiHop);

    /// The single bit owned by `source`.
    #[must_use]
    pub const fn of(source: LiquiditySource) -> Self {
        Self(1 << (source as u8))
    }

    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True when the set holds both the multi-hop bit and the conflict bit.
    #[must_use]
    pub const fn has_multi_hop_conflict(self) -> bool {
        let mask = Self::MULTI_HOP.0 | Self::CONFLICTS_WITH_MULTI_HOP.0;
        self.0 & mask == mask
    }

    /// Sources whose own bit is set.
    pub fn sources(self) -> impl Iterator<Item = LiquiditySource> {
        LiquiditySource::ALL
            .into_iter()
            .filter(move |source| self.contains(Self::of(*source)))
    }
}

impl BitOr for SourceFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for SourceFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
