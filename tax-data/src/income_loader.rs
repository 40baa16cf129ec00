//! CSV loader for taxpayer income entries.
//!
//! ## CSV Format
//!
//! Headers are matched by name; column order does not matter.
//!
//! | Column                 | Required | Notes                                   |
//! |------------------------|----------|-----------------------------------------|
//! | `category`             | yes      | `employment`, `interest`, `dividend`, `rent`, `foreign_income` |
//! | `gross_amount`         | yes      | free-form amount, e.g. `1,250,000.00`   |
//! | `tax_already_withheld` | no       | leave empty or omit for zero            |
//!
//! Amounts are normalized to whole currency: separators and symbols are
//! dropped and unreadable text counts as zero.
//!
//! ```csv
//! category,gross_amount,tax_already_withheld
//! employment,"3,600,000",150000
//! interest,200000,
//! ```
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tax_core::calculations::{RoundingRule, normalize};
use tax_core::{IncomeCategory, IncomeEntry};
use tracing::info;

#[derive(Debug, Deserialize)]
struct CsvRow {
    category: String,
    gross_amount: String,
    #[serde(default)]
    tax_already_withheld: String,
}

/// Errors that can occur while loading income entries.
#[derive(Debug, thiserror::Error)]
pub enum IncomeLoadError {
    /// The CSV structure is invalid or a required column is missing.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `category` cell is not a recognised income category. `row` is
    /// 1-based, header excluded.
    #[error("unrecognised income category '{category}' on row {row}")]
    InvalidCategory { category: String, row: usize },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<IncomeEntry, IncomeLoadError> {
    let category =
        IncomeCategory::parse(&row.category).map_err(|_| IncomeLoadError::InvalidCategory {
            category: row.category.clone(),
            row: row_number,
        })?;

    Ok(IncomeEntry {
        category,
        gross_amount: normalize(&row.gross_amount, RoundingRule::WholeCurrency),
        tax_already_withheld: normalize(&row.tax_already_withheld, RoundingRule::WholeCurrency),
    })
}

/// Parse CSV text into income entries, in file order.
pub fn load_from_str(input: &str) -> Result<Vec<IncomeEntry>, IncomeLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<IncomeEntry>, IncomeLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| IncomeLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = load_from_str(&contents)?;
    info!(path = %path.display(), entries = entries.len(), "income entries loaded");
    Ok(entries)
}
