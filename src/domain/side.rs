//! Trade side.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the market a quote is for.
///
/// On a sell the caller fixes the amount of taker token they give up and the
/// input of every fill is taker token. On a buy the caller fixes the amount
/// of maker token they receive and the input of every fill is maker token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSide {
    Sell,
    Buy,
}

impl MarketSide {
    #[must_use]
    pub const fn is_sell(self) -> bool {
        matches!(self, Self::Sell)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sell => "sell",
            Self::Buy => "buy",
        }
    }
}

impl fmt::Display for MarketSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sell" => Ok(Self::Sell),
            "buy" => Ok(Self::Buy),
            other => Err(format!("unknown market side '{other}'")),
        }
    }
}
