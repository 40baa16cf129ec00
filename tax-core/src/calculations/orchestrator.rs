//! Full income-tax calculation for one taxpayer and assessment year.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::calculate;
//! use tax_core::{
//!     AssessmentYear, IncomeCategory, IncomeEntry, PolicyConfiguration, Reliefs, TaxBrackets,
//! };
//!
//! let year = AssessmentYear::parse("2024/2025").unwrap();
//! let policy = PolicyConfiguration::new(
//!     year.clone(),
//!     TaxBrackets {
//!         first: dec!(6),
//!         second: dec!(12),
//!         third: dec!(18),
//!         fourth: dec!(24),
//!         fifth: dec!(30),
//!         other: dec!(36),
//!     },
//!     Reliefs {
//!         personal_relief: dec!(1200000),
//!         ..Reliefs::default()
//!     },
//! );
//! let entries = [IncomeEntry::new(IncomeCategory::Employment, dec!(2400000))];
//!
//! let result = calculate(&year, &entries, Some(&policy)).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(1200000));
//! // 30,000 + 60,000 + 36,000
//! assert_eq!(result.gross_tax_liability, dec!(126000));
//! assert_eq!(result.net_payable, dec!(126000));
//! ```

use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::brackets::BracketSchedule;
use crate::calculations::common::round_whole;
use crate::calculations::reconcile::ReliefReconciler;
use crate::models::{
    AssessmentYear, CalculationResult, IncomeEntry, PolicyBook, PolicyConfiguration,
};

/// Errors that can occur during a calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// No policy was supplied for the requested assessment year.
    #[error("no tax policy configured for assessment year {0}")]
    PolicyNotFound(AssessmentYear),
}

/// Computes the tax for `entries` under `policy`.
///
/// Fails with [`CalculationError::PolicyNotFound`] when `policy` is `None`
/// or belongs to a different assessment year. Otherwise the calculation
/// cannot fail.
///
/// Headline amounts in the result are rounded to whole currency once,
/// here. `net_payable` is the rounded liability less the rounded credits,
/// so the reported figures always add up; it keeps its sign.
pub fn calculate(
    assessment_year: &AssessmentYear,
    entries: &[IncomeEntry],
    policy: Option<&PolicyConfiguration>,
) -> Result<CalculationResult, CalculationError> {
    let policy = policy
        .filter(|p| &p.assessment_year == assessment_year)
        .ok_or_else(|| CalculationError::PolicyNotFound(assessment_year.clone()))?;

    let reconciliation = ReliefReconciler::new(&policy.reliefs).reconcile(entries);
    let bracket_tax =
        BracketSchedule::new(&policy.tax_brackets).compute(reconciliation.taxable_income);

    debug!(
        year = %assessment_year,
        gross_tax = %bracket_tax.total,
        credits = %reconciliation.credits_applied,
        "bracket tax computed"
    );

    let gross_tax_liability = round_whole(bracket_tax.total);
    let credits_applied = round_whole(reconciliation.credits_applied);

    let result = CalculationResult {
        assessment_year: assessment_year.clone(),
        taxable_income: round_whole(reconciliation.taxable_income),
        bracket_breakdown: bracket_tax.breakdown,
        gross_tax_liability,
        credits: reconciliation.credits,
        credits_applied,
        net_payable: gross_tax_liability.saturating_sub(credits_applied),
    };

    info!(
        year = %result.assessment_year,
        taxable_income = %result.taxable_income,
        net_payable = %result.net_payable,
        "income tax calculated"
    );

    Ok(result)
}

/// Looks up the policy for `assessment_year` in `book` and calculates.
pub fn calculate_from_book(
    assessment_year: &AssessmentYear,
    entries: &[IncomeEntry],
    book: &PolicyBook,
) -> Result<CalculationResult, CalculationError> {
    calculate(assessment_year, entries, book.get(assessment_year))
}
