//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the sampling layer and the fee/gas oracle.

pub mod fees;
pub mod sampler;
