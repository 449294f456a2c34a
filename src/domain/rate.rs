//! Rate comparison functions.
//!
//! Every rate is oriented so that higher is better on both sides: output per
//! input on a sell, input per output on a buy.

use rust_decimal::Decimal;

use super::money::{Amount, Rate};
use super::side::MarketSide;

/// Unit rate of a fill or path; zero if either amount is zero.
#[must_use]
pub fn rate(side: MarketSide, input: Amount, output: Amount) -> Rate {
    if input.is_zero() || output.is_zero() {
        return Decimal::ZERO;
    }
    match side {
        MarketSide::Sell => output / input,
        MarketSide::Buy => input / output,
    }
}

/// Unit rate penalized by the fraction of `target` actually covered.
///
/// On a sell `(o / i) * (i / t)` reduces to `o / t`; on a buy the rate is
/// `(i / o) * (i / t)`. A path that only partially covers the target is
/// therefore never ranked above a complete path at a worse unit rate.
#[must_use]
pub fn complete_rate(side: MarketSide, input: Amount, output: Amount, target: Amount) -> Rate {
    if input.is_zero() || output.is_zero() || target.is_zero() {
        return Decimal::ZERO;
    }
    match side {
        MarketSide::Sell => output / target,
        MarketSide::Buy => (input / output) * (input / target),
    }
}

/// Fractional shortfall of `rate` relative to `best_rate`.
///
/// Zero when `best_rate` is zero.
#[must_use]
pub fn slippage(best_rate: Rate, rate: Rate) -> Decimal {
    if best_rate.is_zero() {
        return Decimal::ZERO;
    }
    (best_rate - rate) / best_rate
}
