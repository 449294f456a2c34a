//! Outbound adapters (driven side).

pub mod curve;
pub mod oracle;

pub use curve::{CurveSampler, LiquidityCurve};
pub use oracle::StaticFeeOracle;
