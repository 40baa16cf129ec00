use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid assessment year '{0}' (expected YYYY/YYYY with consecutive years)")]
    InvalidAssessmentYear(String),

    #[error("unknown income category '{0}'")]
    UnknownIncomeCategory(String),
}
