//! In-memory sampler over piecewise-linear liquidity curves.
//!
//! Stands in for on-chain sampling when quoting from fixtures. Each curve
//! is a list of cumulative `(input, output)` knots with an implied origin;
//! outputs between knots are linearly interpolated and stay flat past the
//! last knot, as a pool does once its reserves are exhausted.
//!
//! Curves are expressed in the orientation of the side being quoted and
//! are not keyed by token pair.

use alloy_primitives::U256;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::domain::money::scale;
use crate::domain::{Amount, FillData, LiquiditySource, MarketSide, SamplePoint, SampledCurve, SignedOrder};
use crate::error::{Error, Result};
use crate::port::outbound::sampler::{LiquiditySampler, SampleRequest};

fn plain() -> FillData {
    FillData::Plain
}

/// Liquidity offered by one route of one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityCurve {
    pub source: LiquiditySource,
    #[serde(default = "plain")]
    pub fill_data: FillData,
    /// Cumulative knots, ascending in input.
    pub points: Vec<SamplePoint>,
}

impl LiquidityCurve {
    /// Cumulative output for `input`.
    #[must_use]
    pub fn output_at(&self, input: Amount) -> Amount {
        if input <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let mut previous = SamplePoint {
            input: Decimal::ZERO,
            output: Decimal::ZERO,
        };
        for point in &self.points {
            if input <= point.input {
                let span = point.input - previous.input;
                if span <= Decimal::ZERO {
                    return point.output;
                }
                return previous.output
                    + scale(point.output - previous.output, input - previous.input, span);
            }
            previous = *point;
        }
        previous.output
    }
}

/// Sampler answering from a fixed set of curves.
#[derive(Debug, Clone, Default)]
pub struct CurveSampler {
    curves: Vec<LiquidityCurve>,
    /// Remaining fillable taker amount per order salt.
    fillable: HashMap<U256, Amount>,
    unavailable: BTreeSet<LiquiditySource>,
}

impl CurveSampler {
    #[must_use]
    pub fn new(curves: Vec<LiquidityCurve>) -> Self {
        Self {
            curves,
            ..Self::default()
        }
    }

    /// Cap the fillable taker amount of the order with `salt`.
    #[must_use]
    pub fn with_fillable(mut self, salt: U256, taker_amount: Amount) -> Self {
        self.fillable.insert(salt, taker_amount);
        self
    }

    /// Make every sample of `source` fail.
    #[must_use]
    pub fn with_unavailable(mut self, source: LiquiditySource) -> Self {
        self.unavailable.insert(source);
        self
    }

    fn fillable_taker_amount(&self, order: &SignedOrder) -> Amount {
        self.fillable
            .get(&order.salt)
            .copied()
            .unwrap_or(order.taker_asset_amount)
            .min(order.taker_asset_amount)
            .max(Decimal::ZERO)
    }
}

#[async_trait]
impl LiquiditySampler for CurveSampler {
    fn name(&self) -> &'static str {
        "curve"
    }

    async fn sample(&self, request: &SampleRequest) -> Result<Vec<SampledCurve>> {
        if self.unavailable.contains(&request.source) {
            return Err(Error::Sampler {
                liquidity: request.source,
                reason: "source unavailable".to_string(),
            });
        }
        Ok(self
            .curves
            .iter()
            .filter(|curve| curve.source == request.source)
            .map(|curve| {
                let outputs: Vec<Amount> = request
                    .amounts
                    .iter()
                    .map(|amount| curve.output_at(*amount))
                    .collect();
                SampledCurve::from_grid(
                    curve.source,
                    curve.fill_data.clone(),
                    &request.amounts,
                    &outputs,
                )
            })
            .collect())
    }

    async fn fillable_amounts(
        &self,
        side: MarketSide,
        orders: &[SignedOrder],
    ) -> Result<Vec<Amount>> {
        Ok(orders
            .iter()
            .map(|order| {
                let taker = self.fillable_taker_amount(order);
                match side {
                    MarketSide::Sell => taker,
                    MarketSide::Buy => {
                        scale(taker, order.maker_asset_amount, order.taker_asset_amount).floor()
                    }
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use rust_decimal_macros::dec;

    fn curve() -> LiquidityCurve {
        LiquidityCurve {
            source: LiquiditySource::Balancer,
            fill_data: FillData::Pool {
                pool: Address::repeat_byte(4),
            },
            points: vec![
                SamplePoint {
                    input: dec!(100),
                    output: dec!(200),
                },
                SamplePoint {
                    input: dec!(200),
                    output: dec!(300),
                },
            ],
        }
    }

    #[test]
    fn interpolates_between_knots() {
        let curve = curve();
        assert_eq!(curve.output_at(dec!(50)), dec!(100));
        assert_eq!(curve.output_at(dec!(150)), dec!(250));
    }

    #[test]
    fn interpolates_eighteen_decimal_knots() {
        let wei = dec!(1000000000000000000);
        let mut curve = curve();
        for point in &mut curve.points {
            point.input *= wei;
            point.output *= wei;
        }
        assert_eq!(curve.output_at(dec!(150) * wei), dec!(250) * wei);
    }

    #[test]
    fn flat_beyond_capacity() {
        assert_eq!(curve().output_at(dec!(1000)), dec!(300));
    }

    #[tokio::test]
    async fn samples_matching_source_only() {
        let sampler = CurveSampler::new(vec![curve()]);
        let request = SampleRequest {
            source: LiquiditySource::Balancer,
            side: MarketSide::Sell,
            maker_token: Address::repeat_byte(1),
            taker_token: Address::repeat_byte(2),
            amounts: vec![dec!(100), dec!(200)],
        };
        let curves = sampler.sample(&request).await.unwrap();
        assert_eq!(curves.len(), 1);
        assert_eq!(curves[0].points[1].output, dec!(300));

        let other = SampleRequest {
            source: LiquiditySource::Curve,
            ..request
        };
        assert!(sampler.sample(&other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unavailable_source_errors() {
        let sampler = CurveSampler::new(vec![curve()]).with_unavailable(LiquiditySource::Balancer);
        let request = SampleRequest {
            source: LiquiditySource::Balancer,
            side: MarketSide::Sell,
            maker_token: Address::ZERO,
            taker_token: Address::ZERO,
            amounts: vec![dec!(1)],
        };
        assert!(matches!(
            sampler.sample(&request).await,
            Err(Error::Sampler { .. })
        ));
    }
}
