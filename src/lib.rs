//! Fillroute - multi-source liquidity path construction and optimization.
//!
//! Given a trade side, a target input amount, caller-supplied signed limit
//! orders and sampled price curves from on-chain liquidity sources, this
//! crate finds the fee-adjusted best way to split the trade across sources
//! and materializes the result as fillable orders.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Pure types: sources and flags, fills, paths, rates, orders
//! - [`application`] - Sample grids, fill construction, the path optimizer,
//!   order materialization and the quote service
//! - [`port`] - Traits for the sampler and fee oracle collaborators
//! - [`adapter`] - In-memory sampler and static fee oracle
//! - [`infrastructure`] - TOML configuration, logging and factories
//! - [`cli`] - The `fillroute` command line
//!
//! # Features
//!
//! - `testkit` - Builders for fills, orders and curves used by tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fillroute::adapter::outbound::CurveSampler;
//! use fillroute::infrastructure::config::Config;
//! use fillroute::infrastructure::factory::quote::build_quote_service;
//!
//! let config = Config::load("config.toml")?;
//! let _service = build_quote_service(&config, Arc::new(CurveSampler::default()))?;
//! # Ok::<(), fillroute::error::Error>(())
//! ```

pub mod adapter;
pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
