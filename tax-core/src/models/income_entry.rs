use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ModelError, ReliefField};

/// Source of an income figure. Determines which relief and credit rate
/// of the policy applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeCategory {
    Employment,
    Interest,
    Dividend,
    Rent,
    ForeignIncome,
}

impl IncomeCategory {
    pub const ALL: [IncomeCategory; 5] = [
        IncomeCategory::Employment,
        IncomeCategory::Interest,
        IncomeCategory::Dividend,
        IncomeCategory::Rent,
        IncomeCategory::ForeignIncome,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employment => "employment",
            Self::Interest => "interest",
            Self::Dividend => "dividend",
            Self::Rent => "rent",
            Self::ForeignIncome => "foreign_income",
        }
    }

    /// Parses a category code, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == code)
            .ok_or_else(|| ModelError::UnknownIncomeCategory(s.to_string()))
    }

    /// The policy rate credited as tax paid at source, if any.
    ///
    /// Employment income carries no statutory advance-tax rate.
    pub fn credit_rate_field(&self) -> Option<ReliefField> {
        match self {
            Self::Employment => None,
            Self::Interest => Some(ReliefField::AitInterest),
            Self::Dividend => Some(ReliefField::AitDividend),
            Self::Rent => Some(ReliefField::WhtRent),
            Self::ForeignIncome => Some(ReliefField::ForeignIncomeTaxRate),
        }
    }
}

impl fmt::Display for IncomeCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One income figure for a taxpayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub category: IncomeCategory,
    pub gross_amount: Decimal,
    /// Tax already deducted at source for this entry.
    #[serde(default)]
    pub tax_already_withheld: Decimal,
}

impl IncomeEntry {
    pub fn new(
        category: IncomeCategory,
        gross_amount: Decimal,
    ) -> Self {
        Self {
            category,
            gross_amount,
            tax_already_withheld: Decimal::ZERO,
        }
    }

    pub fn with_withheld(
        mut self,
        withheld: Decimal,
    ) -> Self {
        self.tax_already_withheld = withheld;
        self
    }
}
