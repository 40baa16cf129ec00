use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One relief or advance-tax field of a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReliefField {
    /// Flat currency amount deducted from total income.
    PersonalRelief,
    /// Percentage of rent income excluded from taxable income.
    RentRelief,
    /// Advance income tax rate on interest.
    AitInterest,
    /// Advance income tax rate on dividends.
    AitDividend,
    /// Withholding tax rate on rent.
    WhtRent,
    /// Tax rate already paid abroad on foreign income.
    ForeignIncomeTaxRate,
}

impl ReliefField {
    pub const ALL: [ReliefField; 6] = [
        ReliefField::PersonalRelief,
        ReliefField::RentRelief,
        ReliefField::AitInterest,
        ReliefField::AitDividend,
        ReliefField::WhtRent,
        ReliefField::ForeignIncomeTaxRate,
    ];

    /// Whether the field holds a percentage rather than a currency amount.
    pub fn is_rate(&self) -> bool {
        !matches!(self, Self::PersonalRelief)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PersonalRelief => "Personal relief",
            Self::RentRelief => "Rent relief",
            Self::AitInterest => "AIT on interest",
            Self::AitDividend => "AIT on dividends",
            Self::WhtRent => "WHT on rent",
            Self::ForeignIncomeTaxRate => "Foreign income tax",
        }
    }
}

/// Reliefs and advance-tax rates of a policy.
///
/// `personal_relief` is a currency amount; every other field is a whole
/// percentage in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reliefs {
    pub personal_relief: Decimal,
    pub rent_relief: Decimal,
    pub ait_interest: Decimal,
    pub ait_dividend: Decimal,
    pub wht_rent: Decimal,
    pub foreign_income_tax_rate: Decimal,
}

impl Reliefs {
    pub fn get(
        &self,
        field: ReliefField,
    ) -> Decimal {
        match field {
            ReliefField::PersonalRelief => self.personal_relief,
            ReliefField::RentRelief => self.rent_relief,
            ReliefField::AitInterest => self.ait_interest,
            ReliefField::AitDividend => self.ait_dividend,
            ReliefField::WhtRent => self.wht_rent,
            ReliefField::ForeignIncomeTaxRate => self.foreign_income_tax_rate,
        }
    }

    pub fn set(
        &mut self,
        field: ReliefField,
        value: Decimal,
    ) {
        let slot = match field {
            ReliefField::PersonalRelief => &mut self.personal_relief,
            ReliefField::RentRelief => &mut self.rent_relief,
            ReliefField::AitInterest => &mut self.ait_interest,
            ReliefField::AitDividend => &mut self.ait_dividend,
            ReliefField::WhtRent => &mut self.wht_rent,
            ReliefField::ForeignIncomeTaxRate => &mut self.foreign_income_tax_rate,
        };
        *slot = value;
    }
}

impl Default for Reliefs {
    fn default() -> Self {
        Self {
            personal_relief: Decimal::ZERO,
            rent_relief: Decimal::ZERO,
            ait_interest: Decimal::ZERO,
            ait_dividend: Decimal::ZERO,
            wht_rent: Decimal::ZERO,
            foreign_income_tax_rate: Decimal::ZERO,
        }
    }
}
