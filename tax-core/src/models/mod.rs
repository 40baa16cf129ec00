mod assessment_year;
mod calculation_result;
mod error;
mod income_entry;
mod policy_book;
mod policy_configuration;
mod reliefs;
mod tax_bracket;

pub use assessment_year::AssessmentYear;
pub use calculation_result::{BandTax, CalculationResult, CategoryCredit};
pub use error::ModelError;
pub use income_entry::{IncomeCategory, IncomeEntry};
pub use policy_book::PolicyBook;
pub use policy_configuration::{PolicyConfiguration, PolicyField};
pub use reliefs::{ReliefField, Reliefs};
pub use tax_bracket::{BAND_WIDTH, Band, TaxBrackets};
