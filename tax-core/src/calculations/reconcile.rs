//! Reliefs and advance-tax credits.
//!
//! Turns a taxpayer's income entries into the taxable income fed to the
//! bracket schedule and the tax already paid at source that is credited
//! against the resulting liability.
//!
//! | Category       | Relief on gross     | Credit rate                 |
//! |----------------|---------------------|-----------------------------|
//! | employment     | none                | none                        |
//! | interest       | none                | `ait_interest`              |
//! | dividend       | none                | `ait_dividend`              |
//! | rent           | `rent_relief`       | `wht_rent`                  |
//! | foreign_income | none                | `foreign_income_tax_rate`   |
//!
//! The personal relief is deducted once from total income.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{max, percent_of};
use crate::models::{CategoryCredit, IncomeCategory, IncomeEntry, Reliefs};

/// Outcome of reconciling income entries against a policy's reliefs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Sum of every entry's gross amount.
    pub gross_income: Decimal,
    /// Portion of rent income excluded by the rent relief rate.
    pub rent_relief: Decimal,
    /// Flat personal relief from the policy.
    pub personal_relief: Decimal,
    /// Gross income less reliefs, never negative.
    pub taxable_income: Decimal,
    /// One entry per income category, in category order.
    pub credits: Vec<CategoryCredit>,
    /// Sum of every category's credit.
    pub credits_applied: Decimal,
}

/// Applies reliefs and computes advance-tax credits.
#[derive(Debug, Clone)]
pub struct ReliefReconciler<'a> {
    reliefs: &'a Reliefs,
}

impl<'a> ReliefReconciler<'a> {
    pub fn new(reliefs: &'a Reliefs) -> Self {
        Self { reliefs }
    }

    /// Reconciles `entries` against the reliefs.
    ///
    /// Statutory credits (gross times the category's advance-tax rate) and
    /// withholding declared on the entries are both tax paid at source and
    /// are added together.
    pub fn reconcile(
        &self,
        entries: &[IncomeEntry],
    ) -> Reconciliation {
        let mut gross_income = Decimal::ZERO;
        let mut rent_relief = Decimal::ZERO;
        let mut credits: Vec<CategoryCredit> = IncomeCategory::ALL
            .into_iter()
            .map(|category| CategoryCredit {
                category,
                statutory_credit: Decimal::ZERO,
                withheld: Decimal::ZERO,
                total: Decimal::ZERO,
            })
            .collect();

        for entry in entries {
            let gross = non_negative(entry.gross_amount, "gross_amount");
            let withheld = non_negative(entry.tax_already_withheld, "tax_already_withheld");

            gross_income = gross_income.saturating_add(gross);
            if entry.category == IncomeCategory::Rent {
                rent_relief =
                    rent_relief.saturating_add(percent_of(gross, self.reliefs.rent_relief));
            }

            let statutory = entry
                .category
                .credit_rate_field()
                .map(|field| percent_of(gross, self.reliefs.get(field)))
                .unwrap_or(Decimal::ZERO);

            let credit = &mut credits[category_index(entry.category)];
            credit.statutory_credit = credit.statutory_credit.saturating_add(statutory);
            credit.withheld = credit.withheld.saturating_add(withheld);
            credit.total = credit
                .total
                .saturating_add(statutory)
                .saturating_add(withheld);
        }

        let personal_relief = self.reliefs.personal_relief;
        let taxable_income = max(
            gross_income
                .saturating_sub(personal_relief)
                .saturating_sub(rent_relief),
            Decimal::ZERO,
        );
        let credits_applied = credits
            .iter()
            .map(|c| c.total)
            .fold(Decimal::ZERO, Decimal::saturating_add);

        debug!(
            entries = entries.len(),
            %gross_income,
            %rent_relief,
            %personal_relief,
            %taxable_income,
            %credits_applied,
            "reliefs reconciled"
        );

        Reconciliation {
            gross_income,
            rent_relief,
            personal_relief,
            taxable_income,
            credits,
            credits_applied,
        }
    }
}

fn category_index(category: IncomeCategory) -> usize {
    IncomeCategory::ALL
        .iter()
        .position(|c| *c == category)
        .unwrap_or_default()
}

fn non_negative(
    amount: Decimal,
    field: &'static str,
) -> Decimal {
    if amount < Decimal::ZERO {
        warn!(field, %amount, "negative amount treated as zero");
        Decimal::ZERO
    } else {
        amount
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn reliefs() -> Reliefs {
        Reliefs {
            personal_relief: dec!(1200000),
            rent_relief: dec!(25),
            ait_interest: dec!(5),
            ait_dividend: dec!(14),
            wht_rent: dec!(10),
            foreign_income_tax_rate: dec!(20),
        }
    }

    fn credit_for(
        result: &Reconciliation,
        category: IncomeCategory,
    ) -> &CategoryCredit {
        &result.credits[category_index(category)]
    }

    // =========================================================================
    // taxable income tests
    // =========================================================================

    #[test]
    fn no_entries_yields_zero() {
        let reliefs = reliefs();

        let result = ReliefReconciler::new(&reliefs).reconcile(&[]);

        assert_eq!(result.gross_income, dec!(0));
        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.credits_applied, dec!(0));
        assert_eq!(result.credits.len(), 5);
    }

    #[test]
    fn personal_relief_cannot_make_income_negative() {
        let reliefs = reliefs();
        let entries = [IncomeEntry::new(IncomeCategory::Employment, dec!(500000))];

        let result = ReliefReconciler::new(&reliefs).reconcile(&entries);

        assert_eq!(result.gross_income, dec!(500000));
        assert_eq!(result.taxable_income, dec!(0));
    }

    #[test]
    fn personal_relief_is_deducted_once() {
        let reliefs = reliefs();
        let entries = [
            IncomeEntry::new(IncomeCategory::Employment, dec!(2000000)),
            IncomeEntry::new(IncomeCategory::Employment, dec!(1000000)),
        ];

        let result = ReliefReconciler::new(&reliefs).reconcile(&entries);

        assert_eq!(result.taxable_income, dec!(1800000));
    }

    #[test]
    fn rent_relief_reduces_only_rent_income() {
        let reliefs = reliefs();
        let entries = [
            IncomeEntry::new(IncomeCategory::Employment, dec!(1200000)),
            IncomeEntry::new(IncomeCategory::Rent, dec!(800000)),
            IncomeEntry::new(IncomeCategory::Interest, dec!(400000)),
        ];

        let result = ReliefReconciler::new(&reliefs).reconcile(&entries);

        // 2,400,000 - 1,200,000 - 25% of 800,000
        assert_eq!(result.rent_relief, dec!(200000));
        assert_eq!(result.taxable_income, dec!(1000000));
    }

    #[test]
    fn negative_amounts_are_treated_as_zero() {
        let reliefs = Reliefs::default();
        let entries = [
            IncomeEntry::new(IncomeCategory::Employment, dec!(-100)).with_withheld(dec!(-5)),
            IncomeEntry::new(IncomeCategory::Employment, dec!(300)),
        ];

        let result = ReliefReconciler::new(&reliefs).reconcile(&entries);

        assert_eq!(result.taxable_income, dec!(300));
        assert_eq!(result.credits_applied, dec!(0));
    }

    // =========================================================================
    // credit tests
    // =========================================================================

    #[test]
    fn statutory_credit_uses_category_rate() {
        let reliefs = reliefs();
        let entries = [
            IncomeEntry::new(IncomeCategory::Interest, dec!(100000)),
            IncomeEntry::new(IncomeCategory::Dividend, dec!(50000)),
            IncomeEntry::new(IncomeCategory::Rent, dec!(300000)),
            IncomeEntry::new(IncomeCategory::ForeignIncome, dec!(10000)),
        ];

        let result = ReliefReconciler::new(&reliefs).reconcile(&entries);

        assert_eq!(credit_for(&result, IncomeCategory::Interest).total, dec!(5000));
        assert_eq!(credit_for(&result, IncomeCategory::Dividend).total, dec!(7000));
        assert_eq!(credit_for(&result, IncomeCategory::Rent).total, dec!(30000));
        assert_eq!(credit_for(&result, IncomeCategory::ForeignIncome).total, dec!(2000));
        assert_eq!(result.credits_applied, dec!(44000));
    }

    #[test]
    fn employment_earns_no_statutory_credit() {
        let reliefs = reliefs();
        let entries = [IncomeEntry::new(IncomeCategory::Employment, dec!(3000000))];

        let result = ReliefReconciler::new(&reliefs).reconcile(&entries);

        assert_eq!(result.credits_applied, dec!(0));
    }

    #[test]
    fn withheld_tax_is_added_to_statutory_credit() {
        let reliefs = reliefs();
        let entries = [
            IncomeEntry::new(IncomeCategory::Interest, dec!(100000)).with_withheld(dec!(5000)),
            IncomeEntry::new(IncomeCategory::Employment, dec!(2000000)).with_withheld(dec!(60000)),
        ];

        let result = ReliefReconciler::new(&reliefs).reconcile(&entries);

        let interest = credit_for(&result, IncomeCategory::Interest);
        assert_eq!(interest.statutory_credit, dec!(5000));
        assert_eq!(interest.withheld, dec!(5000));
        assert_eq!(interest.total, dec!(10000));
        assert_eq!(credit_for(&result, IncomeCategory::Employment).withheld, dec!(60000));
        assert_eq!(result.credits_applied, dec!(70000));
    }

    #[test]
    fn entries_of_the_same_category_are_aggregated() {
        let reliefs = reliefs();
        let entries = [
            IncomeEntry::new(IncomeCategory::Dividend, dec!(10000)),
            IncomeEntry::new(IncomeCategory::Dividend, dec!(15000)),
        ];

        let result = ReliefReconciler::new(&reliefs).reconcile(&entries);

        assert_eq!(credit_for(&result, IncomeCategory::Dividend).total, dec!(3500));
    }

    #[test]
    fn credits_are_listed_in_category_order() {
        let reliefs = reliefs();

        let result = ReliefReconciler::new(&reliefs).reconcile(&[]);

        let categories: Vec<_> = result.credits.iter().map(|c| c.category).collect();
        assert_eq!(categories, IncomeCategory::ALL.to_vec());
    }

    // =========================================================================
    // range tests
    // =========================================================================

    #[test]
    fn near_maximum_amounts_saturate() {
        let mut reliefs = reliefs();
        reliefs.ait_interest = dec!(100);
        let entries = [
            IncomeEntry::new(IncomeCategory::Employment, Decimal::MAX),
            IncomeEntry::new(IncomeCategory::Employment, Decimal::MAX),
            IncomeEntry::new(IncomeCategory::Interest, Decimal::MAX).with_withheld(Decimal::MAX),
        ];

        let result = ReliefReconciler::new(&reliefs).reconcile(&entries);

        assert_eq!(result.gross_income, Decimal::MAX);
        assert_eq!(result.taxable_income, Decimal::MAX - dec!(1200000));
        assert_eq!(credit_for(&result, IncomeCategory::Interest).total, Decimal::MAX);
        assert_eq!(result.credits_applied, Decimal::MAX);
    }
}
