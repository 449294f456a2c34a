//! Monetary types for token amounts and exchange rates.
//!
//! Amounts are token base units (wei-like integers) carried as `Decimal` so
//! intermediate proportional math keeps its precision until an order is
//! materialized and rounded.

use rust_decimal::Decimal;

/// Token amount in base units.
pub type Amount = Decimal;

/// Exchange rate between two amounts.
pub type Rate = Decimal;

/// Scale `amount` by `numerator / denominator`, returning zero when the
/// denominator is zero.
///
/// Multiplies first for exactness. When the product of two base-unit
/// amounts leaves `Decimal` range the ratio is taken first instead, and a
/// result that still does not fit saturates at `Decimal::MAX`.
#[must_use]
pub fn scale(amount: Amount, numerator: Amount, denominator: Amount) -> Amount {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    amount
        .checked_mul(numerator)
        .and_then(|product| product.checked_div(denominator))
        .or_else(|| {
            numerator
                .checked_div(denominator)
                .and_then(|ratio| amount.checked_mul(ratio))
        })
        .unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn scale_is_proportional() {
        assert_eq!(scale(dec!(90), dec!(50), dec!(100)), dec!(45));
    }

    #[test]
    fn scale_by_zero_denominator_is_zero() {
        assert_eq!(scale(dec!(90), dec!(50), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn scale_handles_eighteen_decimal_amounts() {
        let wei = dec!(1000000000000000000);
        assert_eq!(
            scale(dec!(900) * wei, dec!(250) * wei, dec!(500) * wei),
            dec!(450) * wei
        );
        assert_eq!(scale(dec!(1000) * wei, dec!(1000) * wei, dec!(1000) * wei), dec!(1000) * wei);
    }

    #[test]
    fn scale_saturates_instead_of_overflowing() {
        assert_eq!(scale(Decimal::MAX, dec!(3), dec!(2)), Decimal::MAX);
    }
}
