//! Normalization of free-form numeric text.
//!
//! Input never fails to normalize: anything that cannot be read as a
//! number, or exceeds [`MAX_AMOUNT`], becomes zero, and range limits are
//! applied by clamping.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{HUNDRED, round_whole};

/// Largest value `normalize` returns, one quadrillion (10^15).
///
/// Keeps every sum and product the engine forms well inside `Decimal`
/// range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// How a normalized value is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingRule {
    /// Nearest whole currency unit.
    WholeCurrency,
    /// Nearest whole percentage point.
    PercentageRounded,
}

/// Range a percentage field is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateRange {
    /// Marginal bracket rates, `[1, 100]`.
    Bracket,
    /// Relief and advance-tax rates, `[0, 100]`.
    Relief,
}

impl RateRange {
    pub fn min(&self) -> Decimal {
        match self {
            Self::Bracket => Decimal::ONE,
            Self::Relief => Decimal::ZERO,
        }
    }

    pub fn max(&self) -> Decimal {
        HUNDRED
    }
}

/// Keeps ASCII digits and the first decimal point.
fn strip_to_number(raw: &str) -> String {
    let mut seen_point = false;
    raw.chars()
        .filter(|c| match c {
            '0'..='9' => true,
            '.' if !seen_point => {
                seen_point = true;
                true
            }
            _ => false,
        })
        .collect()
}

/// Parses free-form text into a non-negative whole number.
///
/// Every character other than digits and the first `.` is discarded, so
/// signs, currency symbols, thousands separators and percent signs are
/// ignored. Empty or unparsable text, and anything above [`MAX_AMOUNT`],
/// yields exactly zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::normalize::{RoundingRule, normalize};
///
/// assert_eq!(normalize("1,250,000.60", RoundingRule::WholeCurrency), dec!(1250001));
/// assert_eq!(normalize("12.5%", RoundingRule::PercentageRounded), dec!(13));
/// assert_eq!(normalize("abc", RoundingRule::WholeCurrency), dec!(0));
/// ```
pub fn normalize(
    raw: &str,
    rule: RoundingRule,
) -> Decimal {
    let mut digits = strip_to_number(raw);
    if digits.ends_with('.') {
        digits.pop();
    }
    if digits.starts_with('.') {
        digits.insert(0, '0');
    }
    if digits.is_empty() {
        return Decimal::ZERO;
    }

    let value = match Decimal::from_str(&digits) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(input = raw, "numeric input out of range, using 0: {}", e);
            return Decimal::ZERO;
        }
    };

    let rounded = match rule {
        RoundingRule::WholeCurrency | RoundingRule::PercentageRounded => round_whole(value),
    };
    if rounded > MAX_AMOUNT {
        tracing::warn!(input = raw, "numeric input above {}, using 0", MAX_AMOUNT);
        return Decimal::ZERO;
    }
    rounded
}

/// Clamps a percentage into `range`. Values outside it land on the
/// nearest bound.
pub fn clamp_rate(
    value: Decimal,
    range: RateRange,
) -> Decimal {
    value.clamp(range.min(), range.max())
}
