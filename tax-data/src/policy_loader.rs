//! Loads tax policies as supplied by the settings store.
//!
//! Two formats are accepted. JSON mirrors the settings API payload: an
//! array of objects keyed by assessment year.
//!
//! ```json
//! [
//!   {
//!     "year": "2024/2025",
//!     "taxBrackets": { "first": 6, "second": 12, "third": 18,
//!                      "fourth": 24, "fifth": 30, "other": 36 },
//!     "reliefs": { "personalRelief": 1200000, "rentRelief": 25,
//!                  "aitInterest": 5, "aitDividend": 15, "whtRent": 10,
//!                  "foreignIncomeTaxRate": 0 }
//!   }
//! ]
//! ```
//!
//! CSV carries one row per year:
//!
//! | Column                    | Kind      | Range      |
//! |---------------------------|-----------|------------|
//! | `year`                    | YYYY/YYYY |            |
//! | `first` .. `fifth`, `other` | percent | `[1, 100]` |
//! | `personal_relief`         | currency  | `>= 0`     |
//! | `rent_relief`             | percent   | `[0, 100]` |
//! | `ait_interest`            | percent   | `[0, 100]` |
//! | `ait_dividend`            | percent   | `[0, 100]` |
//! | `wht_rent`                | percent   | `[0, 100]` |
//! | `foreign_income_tax_rate` | percent   | `[0, 100]` |
//!
//! Numeric cells go through the same normalization and clamping as a
//! settings edit, so out-of-range or malformed numbers never fail a load.
//! A missing numeric value is read as empty text.

use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    AssessmentYear, Band, ModelError, PolicyBook, PolicyConfiguration, PolicyField, ReliefField,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur when loading policy data.
#[derive(Debug, Error)]
pub enum PolicyLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("invalid assessment year in record {record}: {source}")]
    InvalidYear {
        record: usize,
        #[source]
        source: ModelError,
    },

    #[error("assessment year {0} is defined more than once")]
    DuplicateYear(AssessmentYear),

    #[error("unsupported policy file '{0}' (expected .json or .csv)")]
    UnsupportedFormat(PathBuf),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for PolicyLoaderError {
    fn from(err: csv::Error) -> Self {
        PolicyLoaderError::CsvParse(err.to_string())
    }
}

/// A numeric cell that the settings store may send as a number or text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawCell {
    Number(serde_json::Number),
    Text(String),
}

impl RawCell {
    fn text(cell: &Option<RawCell>) -> String {
        match cell {
            Some(RawCell::Number(n)) => plain_number(n),
            Some(RawCell::Text(s)) => s.clone(),
            None => String::new(),
        }
    }
}

/// Writes a JSON number without an exponent, so `1e-7` reads as
/// `0.0000001` rather than the digits `17`. Numbers outside `Decimal`
/// range become empty text.
fn plain_number(n: &serde_json::Number) -> String {
    let text = n.to_string();
    match Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)) {
        Ok(value) => value.to_string(),
        Err(e) => {
            warn!(number = %text, "JSON number out of range, using 0: {}", e);
            String::new()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct JsonBrackets {
    first: Option<RawCell>,
    second: Option<RawCell>,
    third: Option<RawCell>,
    fourth: Option<RawCell>,
    fifth: Option<RawCell>,
    other: Option<RawCell>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonReliefs {
    personal_relief: Option<RawCell>,
    rent_relief: Option<RawCell>,
    ait_interest: Option<RawCell>,
    ait_dividend: Option<RawCell>,
    wht_rent: Option<RawCell>,
    foreign_income_tax_rate: Option<RawCell>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonPolicy {
    year: String,
    #[serde(default)]
    tax_brackets: JsonBrackets,
    #[serde(default)]
    reliefs: JsonReliefs,
}

impl JsonPolicy {
    fn raw(
        &self,
        field: PolicyField,
    ) -> String {
        let cell = match field {
            PolicyField::Bracket(Band::First) => &self.tax_brackets.first,
            PolicyField::Bracket(Band::Second) => &self.tax_brackets.second,
            PolicyField::Bracket(Band::Third) => &self.tax_brackets.third,
            PolicyField::Bracket(Band::Fourth) => &self.tax_brackets.fourth,
            PolicyField::Bracket(Band::Fifth) => &self.tax_brackets.fifth,
            PolicyField::Bracket(Band::Other) => &self.tax_brackets.other,
            PolicyField::Relief(ReliefField::PersonalRelief) => &self.reliefs.personal_relief,
            PolicyField::Relief(ReliefField::RentRelief) => &self.reliefs.rent_relief,
            PolicyField::Relief(ReliefField::AitInterest) => &self.reliefs.ait_interest,
            PolicyField::Relief(ReliefField::AitDividend) => &self.reliefs.ait_dividend,
            PolicyField::Relief(ReliefField::WhtRent) => &self.reliefs.wht_rent,
            PolicyField::Relief(ReliefField::ForeignIncomeTaxRate) => {
                &self.reliefs.foreign_income_tax_rate
            }
        };
        RawCell::text(cell)
    }
}

/// A single row of a policy CSV file. Every numeric cell is kept as text
/// until it is normalized.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PolicyRecord {
    pub year: String,
    #[serde(default)]
    pub first: String,
    #[serde(default)]
    pub second: String,
    #[serde(default)]
    pub third: String,
    #[serde(default)]
    pub fourth: String,
    #[serde(default)]
    pub fifth: String,
    #[serde(default)]
    pub other: String,
    #[serde(default)]
    pub personal_relief: String,
    #[serde(default)]
    pub rent_relief: String,
    #[serde(default)]
    pub ait_interest: String,
    #[serde(default)]
    pub ait_dividend: String,
    #[serde(default)]
    pub wht_rent: String,
    #[serde(default)]
    pub foreign_income_tax_rate: String,
}

impl PolicyRecord {
    fn raw(
        &self,
        field: PolicyField,
    ) -> &str {
        match field {
            PolicyField::Bracket(Band::First) => &self.first,
            PolicyField::Bracket(Band::Second) => &self.second,
            PolicyField::Bracket(Band::Third) => &self.third,
            PolicyField::Bracket(Band::Fourth) => &self.fourth,
            PolicyField::Bracket(Band::Fifth) => &self.fifth,
            PolicyField::Bracket(Band::Other) => &self.other,
            PolicyField::Relief(ReliefField::PersonalRelief) => &self.personal_relief,
            PolicyField::Relief(ReliefField::RentRelief) => &self.rent_relief,
            PolicyField::Relief(ReliefField::AitInterest) => &self.ait_interest,
            PolicyField::Relief(ReliefField::AitDividend) => &self.ait_dividend,
            PolicyField::Relief(ReliefField::WhtRent) => &self.wht_rent,
            PolicyField::Relief(ReliefField::ForeignIncomeTaxRate) => {
                &self.foreign_income_tax_rate
            }
        }
    }
}

/// Builds a policy from raw field text, as if each field had been typed
/// into the settings form.
fn build_policy<F>(
    record: usize,
    year: &str,
    raw: F,
) -> Result<PolicyConfiguration, PolicyLoaderError>
where
    F: Fn(PolicyField) -> String,
{
    let year = AssessmentYear::parse(year.trim())
        .map_err(|source| PolicyLoaderError::InvalidYear { record, source })?;

    let policy = PolicyField::all().fold(PolicyConfiguration::blank(year), |policy, field| {
        policy.apply_edit(field, &raw(field))
    });
    debug!(record, year = %policy.assessment_year, "policy record parsed");

    Ok(policy)
}

fn into_book(
    policies: Vec<PolicyConfiguration>
) -> Result<PolicyBook, PolicyLoaderError> {
    let mut book = PolicyBook::new();
    for policy in policies {
        let year = policy.assessment_year.clone();
        if book.insert(policy).is_some() {
            return Err(PolicyLoaderError::DuplicateYear(year));
        }
    }
    Ok(book)
}

/// Loader for policy data in JSON or CSV form.
pub struct PolicyLoader;

impl PolicyLoader {
    /// Parse policy records from a CSV reader.
    pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<PolicyRecord>, PolicyLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: PolicyRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Convert parsed CSV records into a [`PolicyBook`].
    ///
    /// Record numbers in errors are 1-based (header excluded).
    pub fn book_from_records(records: &[PolicyRecord]) -> Result<PolicyBook, PolicyLoaderError> {
        let policies = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                build_policy(idx + 1, &record.year, |field| record.raw(field).to_string())
            })
            .collect::<Result<Vec<_>, _>>()?;

        into_book(policies)
    }

    /// Load policies from CSV text.
    pub fn from_csv_str(input: &str) -> Result<PolicyBook, PolicyLoaderError> {
        let records = Self::parse_csv(input.as_bytes())?;
        Self::book_from_records(&records)
    }

    /// Load policies from a JSON array as served by the settings store.
    pub fn from_json_str(input: &str) -> Result<PolicyBook, PolicyLoaderError> {
        let documents: Vec<JsonPolicy> = serde_json::from_str(input)?;
        let policies = documents
            .iter()
            .enumerate()
            .map(|(idx, doc)| build_policy(idx + 1, &doc.year, |field| doc.raw(field)))
            .collect::<Result<Vec<_>, _>>()?;

        into_book(policies)
    }

    /// Load policies from a `.json` or `.csv` file, chosen by extension.
    pub fn from_path(path: &Path) -> Result<PolicyBook, PolicyLoaderError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let read = || {
            fs::read_to_string(path).map_err(|source| PolicyLoaderError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        let book = match extension.as_deref() {
            Some("json") => Self::from_json_str(&read()?)?,
            Some("csv") => Self::from_csv_str(&read()?)?,
            _ => return Err(PolicyLoaderError::UnsupportedFormat(path.to_path_buf())),
        };

        info!(path = %path.display(), years = book.len(), "policies loaded");
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const HEADER: &str = "year,first,second,third,fourth,fifth,other,personal_relief,rent_relief,ait_interest,ait_dividend,wht_rent,foreign_income_tax_rate";

    fn year(s: &str) -> AssessmentYear {
        AssessmentYear::parse(s).unwrap()
    }

    // =========================================================================
    // CSV tests
    // =========================================================================

    #[test]
    fn test_parse_csv_single_policy() {
        let csv = format!("{HEADER}\n2024/2025,6,12,18,24,30,36,1200000,25,5,15,10,0\n");

        let book = PolicyLoader::from_csv_str(&csv).expect("Failed to parse CSV");

        let policy = book.get(&year("2024/2025")).expect("policy for 2024/2025");
        assert_eq!(policy.tax_brackets.first, dec!(6));
        assert_eq!(policy.tax_brackets.other, dec!(36));
        assert_eq!(policy.reliefs.personal_relief, dec!(1200000));
        assert_eq!(policy.reliefs.rent_relief, dec!(25));
        assert_eq!(policy.reliefs.ait_dividend, dec!(15));
        assert_eq!(policy.reliefs.foreign_income_tax_rate, dec!(0));
    }

    #[test]
    fn test_parse_csv_clamps_out_of_range_cells() {
        let csv = format!("{HEADER}\n2024/2025,0,150,18.4,24,30,36,\"1,200,000\",-5,abc,15,10,101\n");

        let book = PolicyLoader::from_csv_str(&csv).expect("Failed to parse CSV");

        let policy = book.get(&year("2024/2025")).unwrap();
        assert_eq!(policy.tax_brackets.first, dec!(1));
        assert_eq!(policy.tax_brackets.second, dec!(100));
        assert_eq!(policy.tax_brackets.third, dec!(18));
        assert_eq!(policy.reliefs.personal_relief, dec!(1200000));
        assert_eq!(policy.reliefs.rent_relief, dec!(5));
        assert_eq!(policy.reliefs.ait_interest, dec!(0));
        assert_eq!(policy.reliefs.foreign_income_tax_rate, dec!(100));
    }

    #[test]
    fn test_parse_csv_missing_columns_default_to_minimums() {
        let csv = "year,first\n2023/2024,8\n";

        let book = PolicyLoader::from_csv_str(csv).expect("Failed to parse CSV");

        let policy = book.get(&year("2023/2024")).unwrap();
        assert_eq!(policy.tax_brackets.first, dec!(8));
        assert_eq!(policy.tax_brackets.second, dec!(1));
        assert_eq!(policy.reliefs.personal_relief, dec!(0));
    }

    #[test]
    fn test_parse_csv_invalid_year() {
        let csv = format!("{HEADER}\n2024/2025,6,12,18,24,30,36,0,0,0,0,0,0\n2024,6,12,18,24,30,36,0,0,0,0,0,0\n");

        let err = PolicyLoader::from_csv_str(&csv).expect_err("Should fail for bad year");

        let PolicyLoaderError::InvalidYear { record, .. } = err else {
            panic!("Expected InvalidYear error, got: {:?}", err);
        };
        assert_eq!(record, 2);
    }

    #[test]
    fn test_parse_csv_duplicate_year() {
        let csv = format!("{HEADER}\n2024/2025,6,12,18,24,30,36,0,0,0,0,0,0\n2024/2025,7,12,18,24,30,36,0,0,0,0,0,0\n");

        let err = PolicyLoader::from_csv_str(&csv).expect_err("Should fail for duplicate");

        match err {
            PolicyLoaderError::DuplicateYear(y) => assert_eq!(y, year("2024/2025")),
            other => panic!("expected DuplicateYear, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_csv_missing_year_column() {
        let csv = "first,second\n6,12\n";

        let err = PolicyLoader::from_csv_str(csv).expect_err("Should fail without year");

        let PolicyLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(msg.contains("missing field"), "got: {}", msg);
    }

    #[test]
    fn test_parse_empty_csv() {
        let book = PolicyLoader::from_csv_str(&format!("{HEADER}\n")).expect("Failed to parse CSV");

        assert!(book.is_empty());
    }

    // =========================================================================
    // JSON tests
    // =========================================================================

    #[test]
    fn test_parse_json_numbers_and_strings() {
        let json = r#"[
            {
                "year": "2024/2025",
                "taxBrackets": { "first": 6, "second": "12", "third": 18.6,
                                 "fourth": 24, "fifth": 30, "other": 36 },
                "reliefs": { "personalRelief": "1,200,000", "rentRelief": 25,
                             "aitInterest": 5, "aitDividend": 15, "whtRent": 10,
                             "foreignIncomeTaxRate": 0 }
            }
        ]"#;

        let book = PolicyLoader::from_json_str(json).expect("Failed to parse JSON");

        let policy = book.get(&year("2024/2025")).unwrap();
        assert_eq!(policy.tax_brackets.second, dec!(12));
        assert_eq!(policy.tax_brackets.third, dec!(19));
        assert_eq!(policy.reliefs.personal_relief, dec!(1200000));
        assert_eq!(policy.reliefs.wht_rent, dec!(10));
    }

    #[test]
    fn test_parse_json_exponent_numbers() {
        let json = r#"[
            {
                "year": "2024/2025",
                "taxBrackets": { "first": 1.25e1, "second": 1e-7, "third": 2E1 },
                "reliefs": { "personalRelief": 1.2e6, "aitInterest": 1e-7,
                             "rentRelief": 1e30, "whtRent": 5e-1 }
            }
        ]"#;

        let book = PolicyLoader::from_json_str(json).expect("Failed to parse JSON");

        let policy = book.get(&year("2024/2025")).unwrap();
        assert_eq!(policy.tax_brackets.first, dec!(13));
        assert_eq!(policy.tax_brackets.second, dec!(1));
        assert_eq!(policy.tax_brackets.third, dec!(20));
        assert_eq!(policy.reliefs.personal_relief, dec!(1200000));
        assert_eq!(policy.reliefs.ait_interest, dec!(0));
        assert_eq!(policy.reliefs.rent_relief, dec!(0));
        assert_eq!(policy.reliefs.wht_rent, dec!(1));
    }

    #[test]
    fn test_plain_number_drops_exponent() {
        let tiny: serde_json::Number = serde_json::from_str("1e-7").unwrap();
        let whole: serde_json::Number = serde_json::from_str("36").unwrap();

        assert_eq!(plain_number(&tiny), "0.0000001");
        assert_eq!(plain_number(&whole), "36");
    }

    #[test]
    fn test_parse_json_missing_sections_use_minimums() {
        let json = r#"[{ "year": "2022/2023" }]"#;

        let book = PolicyLoader::from_json_str(json).expect("Failed to parse JSON");

        let policy = book.get(&year("2022/2023")).unwrap();
        assert_eq!(policy, &PolicyConfiguration::blank(year("2022/2023")));
    }

    #[test]
    fn test_parse_json_multiple_years() {
        let json = r#"[{ "year": "2023/2024" }, { "year": "2024/2025" }]"#;

        let book = PolicyLoader::from_json_str(json).unwrap();

        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_parse_json_malformed() {
        let err = PolicyLoader::from_json_str("{ not json").expect_err("Should fail");

        assert!(matches!(err, PolicyLoaderError::JsonParse(_)));
    }

    #[test]
    fn test_from_path_rejects_unknown_extension() {
        let err = PolicyLoader::from_path(Path::new("policies.xlsx")).expect_err("Should fail");

        assert!(matches!(err, PolicyLoaderError::UnsupportedFormat(_)));
    }
}
