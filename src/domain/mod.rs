//! Source-agnostic quoting domain: sources, orders, fills and paths.

pub mod error;
pub mod fill;
pub mod filter;
pub mod money;
pub mod order;
pub mod path;
pub mod rate;
pub mod sample;
pub mod side;
pub mod source;

pub use error::DomainError;
pub use fill::{ChainId, Fill, FillArena, FillChain, FillData, FillGraph, FillId, HopFillData};
pub use filter::SourceFilters;
pub use money::{Amount, Rate};
pub use order::{AssetData, NativeOrder, SignedOrder};
pub use path::{CollapsedFill, Path, SubFill};
pub use sample::{SamplePoint, SampledCurve};
pub use side::MarketSide;
pub use source::{LiquiditySource, SourceFlags};
