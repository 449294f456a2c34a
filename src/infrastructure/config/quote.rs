//! Quote tuning configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::optimizer::DEFAULT_RUN_LIMIT;
use crate::application::quote::QuoteOptions;
use crate::domain::{LiquiditySource, SourceFilters};

/// `[quote]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteConfig {
    /// Node-visit budget of one optimizer search, halved across merges.
    #[serde(default = "default_run_limit")]
    pub run_limit: usize,
    /// Checkpoints sampled per source.
    #[serde(default = "default_num_samples")]
    pub num_samples: usize,
    /// Geometric growth of the sample grid spacing.
    #[serde(default = "default_sample_distribution_base")]
    pub sample_distribution_base: Decimal,
    /// Slippage buffer applied to bridge orders (e.g., 0.005 = 0.5%).
    #[serde(default = "default_bridge_slippage")]
    pub bridge_slippage: Decimal,
    /// Largest rate shortfall tolerated for on-chain fallback orders.
    #[serde(default = "default_max_fallback_slippage")]
    pub max_fallback_slippage: Decimal,
    #[serde(default = "default_allow_fallback")]
    pub allow_fallback: bool,
    #[serde(default)]
    pub excluded_sources: Vec<LiquiditySource>,
    #[serde(default)]
    pub included_sources: Vec<LiquiditySource>,
    /// Caller-side quote timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

const fn default_run_limit() -> usize {
    DEFAULT_RUN_LIMIT
}

const fn default_num_samples() -> usize {
    13
}

fn default_sample_distribution_base() -> Decimal {
    Decimal::new(105, 2) // 1.05
}

fn default_bridge_slippage() -> Decimal {
    Decimal::new(5, 3) // 0.5%
}

fn default_max_fallback_slippage() -> Decimal {
    Decimal::new(5, 2) // 5%
}

const fn default_allow_fallback() -> bool {
    true
}

const fn default_timeout_ms() -> u64 {
    2000
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            run_limit: default_run_limit(),
            num_samples: default_num_samples(),
            sample_distribution_base: default_sample_distribution_base(),
            bridge_slippage: default_bridge_slippage(),
            max_fallback_slippage: default_max_fallback_slippage(),
            allow_fallback: default_allow_fallback(),
            excluded_sources: Vec::new(),
            included_sources: Vec::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl QuoteConfig {
    /// Source filter described by the exclusion and inclusion lists.
    #[must_use]
    pub fn filters(&self) -> SourceFilters {
        SourceFilters::default()
            .exclude(self.excluded_sources.iter().copied())
            .include(self.included_sources.iter().copied())
    }
}

impl From<&QuoteConfig> for QuoteOptions {
    fn from(config: &QuoteConfig) -> Self {
        Self {
            run_limit: config.run_limit,
            num_samples: config.num_samples,
            sample_distribution_base: config.sample_distribution_base,
            bridge_slippage: config.bridge_slippage,
            max_fallback_slippage: config.max_fallback_slippage,
            allow_fallback: config.allow_fallback,
            filters: config.filters(),
        }
    }
}
