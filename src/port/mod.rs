//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams where the quoting pipeline meets its external
//! collaborators. The core never performs I/O itself; it asks a
//! [`LiquiditySampler`](outbound::sampler::LiquiditySampler) for price curves
//! and a [`FeeOracle`](outbound::fees::FeeOracle) for gas and conversion
//! rates, then works on the returned values.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                                                       ▼
//! ┌─────────┐                                           ┌───────────┐
//! │ Sampler │                                           │ Fee oracle│
//! │ Adapter │                                           │  Adapter  │
//! └─────────┘                                           └───────────┘
//! ```

pub mod outbound;
