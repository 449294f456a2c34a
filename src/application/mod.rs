//! Application services (use cases).
//!
//! Quote construction is split into pure stages, each usable on its own:
//! grid generation, fill construction, path optimization and order
//! materialization. [`quote::QuoteService`] wires them to the outbound ports.

pub mod fills;
pub mod gas;
pub mod optimizer;
pub mod orders;
pub mod quote;
pub mod sampling;

pub use fills::{create_fill_paths, FeeConversion, FillPathOptions};
pub use gas::{FeeModel, GasSchedule};
pub use optimizer::{mix_paths, OptimizerConfig, PathOptimizer};
pub use orders::{create_orders_from_path, BridgeOrder, BridgeRegistry, OptimizedOrder, OrderOptions};
pub use quote::{QuoteOptions, QuoteRequest, QuoteResult, QuoteService};
pub use sampling::sample_amounts;
