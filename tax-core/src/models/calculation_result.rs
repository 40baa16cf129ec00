use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AssessmentYear, Band, IncomeCategory, ReliefField};

/// Tax charged on one band of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandTax {
    pub band: Band,
    pub label: String,
    /// Fixed width of the band; `None` for the unbounded top band.
    pub band_width: Option<Decimal>,
    pub rate_applied: Decimal,
    /// Portion of taxable income that fell into this band.
    pub taxable_amount: Decimal,
    /// Unrounded tax for the band.
    pub tax_for_band: Decimal,
}

/// Tax already paid at source for one income category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCredit {
    pub category: IncomeCategory,
    /// Gross amount times the category's advance-tax rate.
    pub statutory_credit: Decimal,
    /// Withholding declared on the entries themselves.
    pub withheld: Decimal,
    pub total: Decimal,
}

/// Itemized outcome of one calculation.
///
/// The headline amounts are rounded to whole currency; the breakdown and
/// credit lines carry full precision for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub assessment_year: AssessmentYear,
    pub taxable_income: Decimal,
    /// One entry per band, in schedule order.
    pub bracket_breakdown: Vec<BandTax>,
    pub gross_tax_liability: Decimal,
    /// One entry per income category, in category order.
    pub credits: Vec<CategoryCredit>,
    pub credits_applied: Decimal,
    /// Negative when credits exceed the liability (a refund).
    pub net_payable: Decimal,
}

impl CalculationResult {
    pub fn is_refund(&self) -> bool {
        self.net_payable < Decimal::ZERO
    }
}

impl fmt::Display for CalculationResult {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Assessment year:      {}", self.assessment_year)?;
        writeln!(f, "Taxable income:       {}", self.taxable_income)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<16} {:>12} {:>6} {:>16} {:>14}",
            "Band", "Width", "Rate", "Taxable", "Tax"
        )?;
        for line in &self.bracket_breakdown {
            let width = line
                .band_width
                .map(|w| w.to_string())
                .unwrap_or_else(|| "—".to_string());
            writeln!(
                f,
                "{:<16} {:>12} {:>5}% {:>16} {:>14}",
                line.label,
                width,
                line.rate_applied,
                line.taxable_amount,
                line.tax_for_band.round_dp(2)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Gross tax liability:  {}", self.gross_tax_liability)?;
        for credit in self.credits.iter().filter(|c| !c.total.is_zero()) {
            let source = credit
                .category
                .credit_rate_field()
                .map(|field| field.label())
                .unwrap_or("statutory");
            writeln!(
                f,
                "  credit {:<14} {} ({} {}, withheld {})",
                credit.category,
                credit.total.round_dp(2),
                source,
                credit.statutory_credit.round_dp(2),
                credit.withheld.round_dp(2)
            )?;
        }
        writeln!(f, "Credits applied:      {}", self.credits_applied)?;
        if self.is_refund() {
            write!(f, "Refundable:           {}", -self.net_payable)
        } else {
            write!(f, "Net payable:          {}", self.net_payable)
        }
    }
}
