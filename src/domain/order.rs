//! Signed limit orders and asset identifiers.

use alloy_primitives::{Address, Bytes, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::money::{scale, Amount};
use super::side::MarketSide;

/// Identifies what an order side transfers and through which proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "proxy", rename_all = "snake_case")]
pub enum AssetData {
    /// A plain fungible token.
    Erc20 { token: Address },
    /// A fungible token delivered by an on-chain bridge adapter.
    Erc20Bridge {
        token: Address,
        bridge: Address,
        bridge_data: Bytes,
    },
    /// A non-fungible token; never quotable.
    Erc721 { token: Address, token_id: U256 },
}

impl AssetData {
    #[must_use]
    pub const fn erc20(token: Address) -> Self {
        Self::Erc20 { token }
    }

    /// Name of the proxy kind, used in error reports.
    #[must_use]
    pub const fn proxy_name(&self) -> &'static str {
        match self {
            Self::Erc20 { .. } => "erc20",
            Self::Erc20Bridge { .. } => "erc20_bridge",
            Self::Erc721 { .. } => "erc721",
        }
    }

    /// The fungible token behind this asset.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnsupportedAssetProxy`] for non-fungible assets.
    pub fn fungible_token(&self) -> Result<Address, DomainError> {
        match self {
            Self::Erc20 { token } | Self::Erc20Bridge { token, .. } => Ok(*token),
            other => Err(DomainError::UnsupportedAssetProxy {
                proxy: other.proxy_name(),
            }),
        }
    }
}

/// A signed limit order as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedOrder {
    pub maker_address: Address,
    #[serde(default)]
    pub taker_address: Address,
    #[serde(default)]
    pub fee_recipient_address: Address,
    #[serde(default)]
    pub sender_address: Address,
    pub maker_asset_amount: Amount,
    pub taker_asset_amount: Amount,
    #[serde(default)]
    pub maker_fee: Amount,
    #[serde(default)]
    pub taker_fee: Amount,
    pub expiration_time_seconds: u64,
    pub salt: U256,
    pub maker_asset_data: AssetData,
    pub taker_asset_data: AssetData,
    #[serde(default)]
    pub maker_fee_asset_data: Option<AssetData>,
    #[serde(default)]
    pub taker_fee_asset_data: Option<AssetData>,
    #[serde(default)]
    pub signature: Bytes,
}

impl SignedOrder {
    /// Maker and taker tokens of this order.
    ///
    /// # Errors
    ///
    /// Fails when either side is not a fungible asset.
    pub fn token_pair(&self) -> Result<(Address, Address), DomainError> {
        Ok((
            self.maker_asset_data.fungible_token()?,
            self.taker_asset_data.fungible_token()?,
        ))
    }

    fn taker_fee_token(&self) -> Option<Address> {
        self.taker_fee_asset_data
            .as_ref()
            .and_then(|asset| asset.fungible_token().ok())
    }

    fn is_taker_fee_payable_with_taker_asset(&self) -> bool {
        self.taker_fee_token().is_some()
            && self.taker_fee_token() == self.taker_asset_data.fungible_token().ok()
    }

    fn is_taker_fee_payable_with_maker_asset(&self) -> bool {
        self.taker_fee_token().is_some()
            && self.taker_fee_token() == self.maker_asset_data.fungible_token().ok()
    }
}

/// A signed order together with its currently fillable amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeOrder {
    pub order: SignedOrder,
    pub fillable_maker_amount: Amount,
    pub fillable_taker_amount: Amount,
    pub fillable_taker_fee_amount: Amount,
}

impl NativeOrder {
    /// Derive fillable amounts from the sampled fillable amount.
    ///
    /// `fillable` is denominated in the taker token on a sell and in the
    /// maker token on a buy.
    #[must_use]
    pub fn from_fillable(side: MarketSide, order: SignedOrder, fillable: Amount) -> Self {
        let (fillable_maker_amount, fillable_taker_amount) = match side {
            MarketSide::Sell => (
                scale(fillable, order.maker_asset_amount, order.taker_asset_amount).floor(),
                fillable,
            ),
            MarketSide::Buy => (
                fillable,
                scale(fillable, order.taker_asset_amount, order.maker_asset_amount).ceil(),
            ),
        };
        let fillable_taker_fee_amount =
            scale(fillable_taker_amount, order.taker_fee, order.taker_asset_amount).ceil();
        Self {
            order,
            fillable_maker_amount,
            fillable_taker_amount,
            fillable_taker_fee_amount,
        }
    }

    /// Treat the whole order as fillable.
    #[must_use]
    pub fn fully_fillable(order: SignedOrder) -> Self {
        let fillable = order.taker_asset_amount;
        Self::from_fillable(MarketSide::Sell, order, fillable)
    }

    /// Taker tokens spent when filling the fillable remainder, fees included.
    #[must_use]
    pub fn taker_amount_after_fees(&self) -> Amount {
        if self.order.is_taker_fee_payable_with_taker_asset() {
            self.fillable_taker_amount + self.fillable_taker_fee_amount
        } else {
            self.fillable_taker_amount
        }
    }

    /// Maker tokens received when filling the fillable remainder, fees deducted.
    #[must_use]
    pub fn maker_amount_after_fees(&self) -> Amount {
        if self.order.is_taker_fee_payable_with_maker_asset() {
            (self.fillable_maker_amount - self.fillable_taker_fee_amount).max(Decimal::ZERO)
        } else {
            self.fillable_maker_amount
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn token(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn order(maker: Amount, taker: Amount, taker_fee: Amount, fee_token: Option<Address>) -> SignedOrder {
        SignedOrder {
            maker_address: token(0xaa),
            taker_address: Address::ZERO,
            fee_recipient_address: Address::ZERO,
            sender_address: Address::ZERO,
            maker_asset_amount: maker,
            taker_asset_amount: taker,
            maker_fee: Decimal::ZERO,
            taker_fee,
            expiration_time_seconds: 1_900_000_000,
            salt: U256::from(7u64),
            maker_asset_data: AssetData::erc20(token(1)),
            taker_asset_data: AssetData::erc20(token(2)),
            maker_fee_asset_data: None,
            taker_fee_asset_data: fee_token.map(AssetData::erc20),
            signature: Bytes::new(),
        }
    }

    #[test]
    fn sell_fillable_rounds_maker_down() {
        let native = NativeOrder::from_fillable(
            MarketSide::Sell,
            order(dec!(100), dec!(300), Decimal::ZERO, None),
            dec!(100),
        );
        assert_eq!(native.fillable_taker_amount, dec!(100));
        assert_eq!(native.fillable_maker_amount, dec!(33));
    }

    #[test]
    fn buy_fillable_rounds_taker_up() {
        let native = NativeOrder::from_fillable(
            MarketSide::Buy,
            order(dec!(300), dec!(100), Decimal::ZERO, None),
            dec!(100),
        );
        assert_eq!(native.fillable_maker_amount, dec!(100));
        assert_eq!(native.fillable_taker_amount, dec!(34));
    }

    #[test]
    fn eighteen_decimal_orders_scale_without_overflow() {
        let wei = dec!(1000000000000000000);
        let native = NativeOrder::fully_fillable(order(
            dec!(1000) * wei,
            dec!(1000) * wei,
            Decimal::ZERO,
            None,
        ));
        assert_eq!(native.fillable_maker_amount, dec!(1000) * wei);

        let native = NativeOrder::from_fillable(
            MarketSide::Sell,
            order(dec!(2000) * wei, dec!(1000) * wei, dec!(10) * wei, Some(token(2))),
            dec!(400) * wei,
        );
        assert_eq!(native.fillable_maker_amount, dec!(800) * wei);
        assert_eq!(native.fillable_taker_fee_amount, dec!(4) * wei);
    }

    #[test]
    fn taker_fee_in_taker_token_increases_taker_amount() {
        let native = NativeOrder::fully_fillable(order(dec!(100), dec!(200), dec!(10), Some(token(2))));
        assert_eq!(native.fillable_taker_fee_amount, dec!(10));
        assert_eq!(native.taker_amount_after_fees(), dec!(210));
        assert_eq!(native.maker_amount_after_fees(), dec!(100));
    }

    #[test]
    fn taker_fee_in_maker_token_reduces_maker_amount() {
        let native = NativeOrder::fully_fillable(order(dec!(100), dec!(200), dec!(10), Some(token(1))));
        assert_eq!(native.taker_amount_after_fees(), dec!(200));
        assert_eq!(native.maker_amount_after_fees(), dec!(90));
    }

    #[test]
    fn non_fungible_asset_is_rejected() {
        let asset = AssetData::Erc721 {
            token: token(3),
            token_id: U256::from(1u64),
        };
        assert_eq!(
            asset.fungible_token(),
            Err(DomainError::UnsupportedAssetProxy { proxy: "erc721" })
        );
    }
}
