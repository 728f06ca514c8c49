//! Monetary amounts.
//!
//! Balances, bets and wins are `rust_decimal::Decimal`. Every persisted
//! balance is canonicalised to two fraction digits with midpoint-to-even
//! rounding.

pub use rust_decimal::Decimal;

/// Number of fraction digits kept on every balance mutation
pub const BALANCE_SCALE: u32 = 2;

/// Canonicalise an amount to [`BALANCE_SCALE`] fraction digits
pub fn round_balance(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp(BALANCE_SCALE);
    // Keep "100" and "100.00" indistinguishable on the wire.
    rounded.rescale(BALANCE_SCALE);
    rounded
}

pub fn is_positive(amount: Decimal) -> bool {
    amount > Decimal::ZERO
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_balance_two_digits() {
        assert_eq!(round_balance(dec!(10.456)), dec!(10.46));
        assert_eq!(round_balance(dec!(100)).to_string(), "100.00");
    }

    #[test]
    fn test_round_balance_midpoint_to_even() {
        assert_eq!(round_balance(dec!(0.125)), dec!(0.12));
        assert_eq!(round_balance(dec!(0.135)), dec!(0.14));
    }

    #[test]
    fn test_is_positive() {
        assert!(is_positive(dec!(0.01)));
        assert!(!is_positive(Decimal::ZERO));
        assert!(!is_positive(dec!(-1)));
    }
}
