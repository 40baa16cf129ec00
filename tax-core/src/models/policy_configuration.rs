use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AssessmentYear, Band, ReliefField, Reliefs, TaxBrackets};
use crate::calculations::normalize::{RateRange, RoundingRule, clamp_rate, normalize};

/// An editable field of a [`PolicyConfiguration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "field")]
pub enum PolicyField {
    Bracket(Band),
    Relief(ReliefField),
}

impl PolicyField {
    /// Every editable field: the six bracket rates, then the six reliefs.
    pub fn all() -> impl Iterator<Item = PolicyField> {
        Band::ALL
            .into_iter()
            .map(PolicyField::Bracket)
            .chain(ReliefField::ALL.into_iter().map(PolicyField::Relief))
    }

    pub fn rounding_rule(&self) -> RoundingRule {
        match self {
            Self::Relief(relief) if !relief.is_rate() => RoundingRule::WholeCurrency,
            _ => RoundingRule::PercentageRounded,
        }
    }

    /// Clamps a normalized value into the range the field accepts.
    ///
    /// Personal relief is a currency amount and is only bounded below by
    /// normalization itself.
    pub fn clamp(
        &self,
        value: Decimal,
    ) -> Decimal {
        match self {
            Self::Bracket(_) => clamp_rate(value, RateRange::Bracket),
            Self::Relief(relief) if !relief.is_rate() => value,
            Self::Relief(_) => clamp_rate(value, RateRange::Relief),
        }
    }
}

/// Bracket rates, reliefs and advance-tax rates for one assessment year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfiguration {
    pub assessment_year: AssessmentYear,
    pub tax_brackets: TaxBrackets,
    pub reliefs: Reliefs,
}

impl PolicyConfiguration {
    pub fn new(
        assessment_year: AssessmentYear,
        tax_brackets: TaxBrackets,
        reliefs: Reliefs,
    ) -> Self {
        Self {
            assessment_year,
            tax_brackets,
            reliefs,
        }
    }

    /// A policy with every bracket at the minimum 1% rate and no reliefs.
    pub fn blank(assessment_year: AssessmentYear) -> Self {
        let min_rate = RateRange::Bracket.min();
        Self::new(
            assessment_year,
            TaxBrackets {
                first: min_rate,
                second: min_rate,
                third: min_rate,
                fourth: min_rate,
                fifth: min_rate,
                other: min_rate,
            },
            Reliefs::default(),
        )
    }

    pub fn value(
        &self,
        field: PolicyField,
    ) -> Decimal {
        match field {
            PolicyField::Bracket(band) => self.tax_brackets.rate(band),
            PolicyField::Relief(relief) => self.reliefs.get(relief),
        }
    }

    /// Returns a copy of this policy with `field` set from free-form text.
    ///
    /// The text is normalized with the field's rounding rule and clamped
    /// into its range. Out-of-range or unparsable input never fails: it
    /// lands on the nearest bound or on zero before clamping.
    pub fn apply_edit(
        &self,
        field: PolicyField,
        raw: &str,
    ) -> Self {
        let value = field.clamp(normalize(raw, field.rounding_rule()));
        tracing::debug!(
            year = %self.assessment_year,
            ?field,
            raw,
            previous = %self.value(field),
            %value,
            "policy field edited"
        );

        let mut edited = self.clone();
        match field {
            PolicyField::Bracket(band) => edited.tax_brackets.set_rate(band, value),
            PolicyField::Relief(relief) => edited.reliefs.set(relief, value),
        }
        edited
    }
}
