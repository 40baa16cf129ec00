pub mod calculations;
pub mod models;

pub use calculations::{CalculationError, calculate, calculate_from_book};
pub use models::*;
