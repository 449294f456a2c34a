//! Gas schedule and fee model.
//!
//! Fees are flat per settlement: a source costs the same gas whether it
//! fills one unit or the whole trade. Native orders additionally pay the
//! exchange's protocol fee, which scales with the gas price.

use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::domain::{Amount, FillData, LiquiditySource};
use crate::port::outbound::fees::FeeEstimator;

/// Protocol fee multiplier applied to the gas price for native fills.
pub const DEFAULT_PROTOCOL_FEE_MULTIPLIER: u64 = 70_000;

/// Per-source gas estimates with optional overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GasSchedule {
    overrides: HashMap<LiquiditySource, u64>,
}

impl GasSchedule {
    #[must_use]
    pub fn new(overrides: HashMap<LiquiditySource, u64>) -> Self {
        Self { overrides }
    }

    /// Replace the estimate for one source.
    #[must_use]
    pub fn with_override(mut self, source: LiquiditySource, gas: u64) -> Self {
        self.overrides.insert(source, gas);
        self
    }

    /// Estimated gas to settle a fill from `source` with `fill_data`.
    #[must_use]
    pub fn gas(&self, source: LiquiditySource, fill_data: &FillData) -> u64 {
        if let Some(gas) = self.overrides.get(&source) {
            return *gas;
        }
        self.default_gas(source, fill_data)
    }

    fn default_gas(&self, source: LiquiditySource, fill_data: &FillData) -> u64 {
        use LiquiditySource as S;
        match source {
            S::Native => 150_000,
            S::Uniswap => 90_000,
            S::LiquidityProvider => 140_000,
            S::Eth2Dai => 400_000,
            S::Kyber => 500_000,
            S::Curve => 600_000,
            S::MultiBridge => 350_000,
            S::UniswapV2 | S::SushiSwap => {
                let extra_hops = match fill_data {
                    FillData::TokenPath { token_path } => token_path.len().saturating_sub(2),
                    _ => 0,
                };
                90_000 + 60_000 * extra_hops as u64
            }
            S::Balancer => 120_000,
            S::Cream => 300_000,
            S::MStable => 700_000,
            S::Mooniswap => 130_000,
            S::Swerve => 150_000,
            S::SnowSwap => 1_000_000,
            S::Shell => 300_000,
            S::Dodo => match fill_data {
                FillData::Dodo {
                    is_sell_base: true, ..
                } => 180_000,
                _ => 300_000,
            },
            S::Bancor => {
                // Bancor paths alternate token, anchor, token.
                let extra_hops = match fill_data {
                    FillData::Bancor { path, .. } => path.len().saturating_sub(3) / 2,
                    _ => 0,
                };
                300_000 + 250_000 * extra_hops as u64
            }
            S::MultiHop => match fill_data {
                FillData::MultiHop {
                    first_hop,
                    second_hop,
                    ..
                } => {
                    self.gas(first_hop.source, &first_hop.fill_data)
                        + self.gas(second_hop.source, &second_hop.fill_data)
                }
                _ => 0,
            },
        }
    }
}

/// Fee estimator pricing gas at a fixed gas price.
#[derive(Debug, Clone)]
pub struct FeeModel {
    schedule: GasSchedule,
    gas_price: Amount,
    protocol_fee_multiplier: Amount,
}

impl FeeModel {
    #[must_use]
    pub fn new(schedule: GasSchedule, gas_price: Amount, protocol_fee_multiplier: Amount) -> Self {
        Self {
            schedule,
            gas_price,
            protocol_fee_multiplier,
        }
    }

    #[must_use]
    pub const fn gas_price(&self) -> Amount {
        self.gas_price
    }
}

impl FeeEstimator for FeeModel {
    fn fee(&self, source: LiquiditySource, fill_data: &FillData) -> Amount {
        let gas = Decimal::from(self.schedule.gas(source, fill_data));
        let fee = gas.saturating_mul(self.gas_price);
        if source.is_native() {
            return fee.saturating_add(self.protocol_fee_multiplier.saturating_mul(self.gas_price));
        }
        fee
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HopFillData;
    use alloy_primitives::Address;
    use rust_decimal_macros::dec;

    fn token_path(len: u8) -> FillData {
        FillData::TokenPath {
            token_path: (0..len).map(Address::repeat_byte).collect(),
        }
    }

    #[test]
    fn uniswap_v2_charges_per_extra_hop() {
        let schedule = GasSchedule::default();
        assert_eq!(schedule.gas(LiquiditySource::UniswapV2, &token_path(2)), 90_000);
        assert_eq!(schedule.gas(LiquiditySource::SushiSwap, &token_path(4)), 210_000);
    }

    #[test]
    fn multi_hop_sums_both_legs() {
        let schedule = GasSchedule::default();
        let data = FillData::MultiHop {
            intermediate_token: Address::repeat_byte(7),
            first_hop: Box::new(HopFillData {
                source: LiquiditySource::UniswapV2,
                fill_data: token_path(2),
            }),
            second_hop: Box::new(HopFillData {
                source: LiquiditySource::Balancer,
                fill_data: FillData::Pool {
                    pool: Address::repeat_byte(3),
                },
            }),
        };
        assert_eq!(schedule.gas(LiquiditySource::MultiHop, &data), 210_000);
    }

    #[test]
    fn overrides_win() {
        let schedule = GasSchedule::default().with_override(LiquiditySource::Curve, 1);
        assert_eq!(schedule.gas(LiquiditySource::Curve, &FillData::Plain), 1);
    }

    #[test]
    fn native_fee_includes_protocol_fee() {
        let model = FeeModel::new(GasSchedule::default(), dec!(10), dec!(70000));
        let plain = FillData::Plain;
        assert_eq!(model.fee(LiquiditySource::Uniswap, &plain), dec!(900000));
        assert_eq!(model.fee(LiquiditySource::Native, &plain), dec!(2200000));
    }
}
