//! Builders for domain primitives used across tests.
//!
//! Orders default to the [`MAKER_TOKEN`]/[`TAKER_TOKEN`] pair so tests focus
//! on amounts rather than construction boilerplate.

use alloy_primitives::{Address, Bytes, U256};
use rust_decimal::Decimal;

use crate::adapter::outbound::LiquidityCurve;
use crate::application::quote::QuoteRequest;
use crate::domain::{
    Amount, AssetData, FillData, LiquiditySource, MarketSide, NativeOrder, SamplePoint,
    SampledCurve, SignedOrder,
};

/// Token received by the taker in test quotes.
pub const MAKER_TOKEN: Address = Address::new([0x01; 20]);

/// Token paid by the taker in test quotes.
pub const TAKER_TOKEN: Address = Address::new([0x02; 20]);

/// Address filled with `byte`.
pub fn token(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

/// A signed order selling `maker_amount` of [`MAKER_TOKEN`] for
/// `taker_amount` of [`TAKER_TOKEN`].
pub fn signed_order(maker_amount: Amount, taker_amount: Amount, salt: u64) -> SignedOrder {
    SignedOrder {
        maker_address: token(0xaa),
        taker_address: Address::ZERO,
        fee_recipient_address: Address::ZERO,
        sender_address: Address::ZERO,
        maker_asset_amount: maker_amount,
        taker_asset_amount: taker_amount,
        maker_fee: Decimal::ZERO,
        taker_fee: Decimal::ZERO,
        expiration_time_seconds: 1_900_000_000,
        salt: U256::from(salt),
        maker_asset_data: AssetData::erc20(MAKER_TOKEN),
        taker_asset_data: AssetData::erc20(TAKER_TOKEN),
        maker_fee_asset_data: None,
        taker_fee_asset_data: None,
        signature: Bytes::from_static(&[0x1b]),
    }
}

/// A fully fillable native order.
pub fn native_order(maker_amount: Amount, taker_amount: Amount, salt: u64) -> NativeOrder {
    NativeOrder::fully_fillable(signed_order(maker_amount, taker_amount, salt))
}

/// A plain liquidity curve through the cumulative `(input, output)` knots.
pub fn curve(source: LiquiditySource, knots: &[(Amount, Amount)]) -> LiquidityCurve {
    LiquidityCurve {
        source,
        fill_data: FillData::Plain,
        points: knots
            .iter()
            .map(|(input, output)| SamplePoint {
                input: *input,
                output: *output,
            })
            .collect(),
    }
}

/// A sampled curve with plain fill data.
pub fn sampled(source: LiquiditySource, knots: &[(Amount, Amount)]) -> SampledCurve {
    let (inputs, outputs): (Vec<Amount>, Vec<Amount>) = knots.iter().copied().unzip();
    SampledCurve::from_grid(source, FillData::Plain, &inputs, &outputs)
}

/// A request for `amount` on `side` over the default token pair.
pub fn quote_request(side: MarketSide, amount: Amount) -> QuoteRequest {
    QuoteRequest {
        side,
        maker_token: MAKER_TOKEN,
        taker_token: TAKER_TOKEN,
        amount,
        native_orders: Vec::new(),
    }
}
