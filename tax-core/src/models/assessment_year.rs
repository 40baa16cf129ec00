use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::ModelError;

/// The fiscal year a policy and a calculation apply to, e.g. `"2024/2025"`.
///
/// Two assessment years are equal only when their strings match exactly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssessmentYear(String);

impl AssessmentYear {
    /// Parses a `YYYY/YYYY` string where the second year follows the first.
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        let invalid = || ModelError::InvalidAssessmentYear(s.to_string());

        let (start, end) = s.split_once('/').ok_or_else(invalid)?;
        if start.len() != 4
            || end.len() != 4
            || !start.bytes().all(|b| b.is_ascii_digit())
            || !end.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let start_year: u32 = start.parse().map_err(|_| invalid())?;
        let end_year: u32 = end.parse().map_err(|_| invalid())?;
        if end_year != start_year + 1 {
            return Err(invalid());
        }

        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AssessmentYear {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AssessmentYear {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AssessmentYear> for String {
    fn from(year: AssessmentYear) -> Self {
        year.0
    }
}

impl fmt::Display for AssessmentYear {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}
