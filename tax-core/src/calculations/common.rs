//! Common utility functions for tax calculations.
//!
//! Amounts are carried at full precision through every intermediate step
//! and rounded once, at the boundary where they are reported.

use rust_decimal::{Decimal, RoundingStrategy};

/// One hundred, the divisor for percentage rates.
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rounds a decimal value to whole currency units using half-up rounding.
///
/// Values at exactly .5 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(123.4)), dec!(123));
/// assert_eq!(round_whole(dec!(123.5)), dec!(124));
/// assert_eq!(round_whole(dec!(-123.5)), dec!(-124)); // Away from zero
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Applies a percentage rate to an amount without rounding.
///
/// Never overflows: a product too large for `Decimal` is formed from the
/// scaled-down amount and saturates at the `Decimal` bounds.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(500000), dec!(10)), dec!(50000));
/// assert_eq!(percent_of(dec!(333), dec!(5)), dec!(16.65));
/// ```
pub fn percent_of(
    amount: Decimal,
    rate: Decimal,
) -> Decimal {
    match amount.checked_mul(rate) {
        Some(product) => product / HUNDRED,
        None => (amount / HUNDRED).saturating_mul(rate),
    }
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_whole tests
    // =========================================================================

    #[test]
    fn round_whole_rounds_down_below_midpoint() {
        let result = round_whole(dec!(123.49));

        assert_eq!(result, dec!(123));
    }

    #[test]
    fn round_whole_rounds_up_at_midpoint() {
        let result = round_whole(dec!(123.5));

        assert_eq!(result, dec!(124));
    }

    #[test]
    fn round_whole_handles_negative_values() {
        let result = round_whole(dec!(-350000.5));

        assert_eq!(result, dec!(-350001)); // Away from zero
    }

    #[test]
    fn round_whole_handles_zero() {
        let result = round_whole(dec!(0.00));

        assert_eq!(result, dec!(0));
    }

    // =========================================================================
    // percent_of tests
    // =========================================================================

    #[test]
    fn percent_of_keeps_fractional_result() {
        let result = percent_of(dec!(12345), dec!(7));

        assert_eq!(result, dec!(864.15));
    }

    #[test]
    fn percent_of_zero_rate_is_zero() {
        let result = percent_of(dec!(1000000), dec!(0));

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn percent_of_full_rate_is_identity() {
        let result = percent_of(dec!(987654), dec!(100));

        assert_eq!(result, dec!(987654));
    }

    #[test]
    fn percent_of_huge_amount_does_not_overflow() {
        let result = percent_of(Decimal::MAX, dec!(60));

        assert!(result > Decimal::MAX / dec!(2));
        assert!(result < Decimal::MAX);
    }

    #[test]
    fn percent_of_huge_amount_at_full_rate_keeps_magnitude() {
        let result = percent_of(Decimal::MAX, dec!(100));

        assert!(result >= Decimal::MAX - dec!(1));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100), dec!(200)), dec!(200));
        assert_eq!(max(dec!(200), dec!(100)), dec!(200));
    }

    #[test]
    fn max_floors_negative_at_zero() {
        let result = max(dec!(-700000), Decimal::ZERO);

        assert_eq!(result, dec!(0));
    }
}
