//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for tokens, signed orders and liquidity curves.
//! - [`graph`] - [`GraphBuilder`](graph::GraphBuilder) for hand-made fill
//!   graphs fed straight to the optimizer.

pub mod domain;
pub mod graph;
