//! Progressive bracket tax.
//!
//! Taxable income is consumed band by band: each of the first five bands
//! takes at most [`BAND_WIDTH`](crate::models::BAND_WIDTH), and whatever
//! is left after the fifth is taxed at the `other` rate.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::BracketSchedule;
//! use tax_core::TaxBrackets;
//!
//! let brackets = TaxBrackets {
//!     first: dec!(10),
//!     second: dec!(20),
//!     third: dec!(30),
//!     fourth: dec!(40),
//!     fifth: dec!(50),
//!     other: dec!(60),
//! };
//!
//! let tax = BracketSchedule::new(&brackets).compute(dec!(1000000));
//!
//! assert_eq!(tax.total, dec!(150000));
//! assert_eq!(tax.breakdown.len(), 6);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::percent_of;
use crate::models::{BandTax, TaxBrackets};

/// Tax produced by a [`BracketSchedule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTax {
    /// Exact sum of every band's tax.
    pub total: Decimal,
    /// Always six entries, in schedule order; unused bands contribute zero.
    pub breakdown: Vec<BandTax>,
}

/// Applies a six-band marginal-rate schedule to taxable income.
#[derive(Debug, Clone)]
pub struct BracketSchedule<'a> {
    brackets: &'a TaxBrackets,
}

impl<'a> BracketSchedule<'a> {
    pub fn new(brackets: &'a TaxBrackets) -> Self {
        Self { brackets }
    }

    /// Computes the tax on `taxable_income`.
    ///
    /// Negative income is not a valid input; it is treated as zero.
    pub fn compute(
        &self,
        taxable_income: Decimal,
    ) -> BracketTax {
        let mut remaining = if taxable_income < Decimal::ZERO {
            warn!(%taxable_income, "negative taxable income treated as zero");
            Decimal::ZERO
        } else {
            taxable_income
        };

        let mut total = Decimal::ZERO;
        let mut breakdown = Vec::with_capacity(6);

        for (band, rate) in self.brackets.iter() {
            let consumed = match band.width() {
                Some(width) => remaining.min(width),
                None => remaining,
            };
            remaining -= consumed;

            let tax_for_band = percent_of(consumed, rate);
            total = total.saturating_add(tax_for_band);

            breakdown.push(BandTax {
                band,
                label: band.label().to_string(),
                band_width: band.width(),
                rate_applied: rate,
                taxable_amount: consumed,
                tax_for_band,
            });
        }

        debug_assert!(remaining.is_zero());
        debug_assert_eq!(breakdown.len(), 6);

        BracketTax { total, breakdown }
    }
}
