//! Value-level quote failures.
//!
//! These errors are returned by fill construction, the path optimizer and
//! the order materializer. None of them is retried inside the crate; callers
//! may retry with a larger run limit or a different source set.
//!
//! # Examples
//!
//! ```
//! use fillroute::domain::error::DomainError;
//! use rust_decimal_macros::dec;
//!
//! let err = DomainError::InsufficientLiquidity {
//!     available: dec!(80),
//!     target: dec!(100),
//! };
//! assert_eq!(err.to_string(), "insufficient liquidity: 80 available of 100 requested");
//! ```

use thiserror::Error;

use super::money::Amount;
use super::source::LiquiditySource;

/// Errors produced while building, searching or materializing a quote.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// No native orders and no sampled liquidity were supplied.
    #[error("no native orders or sampled liquidity supplied")]
    EmptyInput,

    /// The search finished without any path reaching the target input.
    #[error("insufficient liquidity: {available} available of {target} requested")]
    InsufficientLiquidity {
        /// Input covered by the best partial path.
        available: Amount,
        /// Requested input.
        target: Amount,
    },

    /// The search produced no viable candidate, not even a partial one.
    #[error("no optimal path found")]
    NoOptimalPath,

    /// A bridge order was requested for a source with no adapter address.
    #[error("no bridge adapter configured for source {liquidity}")]
    UnknownBridge {
        /// Source lacking an adapter.
        liquidity: LiquiditySource,
    },

    /// An asset identifier uses a proxy kind that cannot be quoted.
    #[error("unsupported asset proxy: {proxy}")]
    UnsupportedAssetProxy {
        /// Name of the offending proxy kind.
        proxy: &'static str,
    },

    /// A fill carries routing data for a different source.
    #[error("fill data does not match source {liquidity}")]
    MismatchedFillData {
        /// Source of the fill.
        liquidity: LiquiditySource,
    },

    /// A native order trades a different token pair than the quote.
    #[error("native order trades a different token pair than requested")]
    OrderPairMismatch,
}
