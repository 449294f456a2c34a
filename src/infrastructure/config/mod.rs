//! Infrastructure configuration modules.

pub mod bridges;
pub mod fees;
pub mod logging;
pub mod quote;
pub mod settings;

pub use settings::Config;
