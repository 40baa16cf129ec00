//! Income-tax calculation engine.
//!
//! Every function here is pure: the result depends only on the arguments,
//! and nothing is read from or written to shared state.

pub mod brackets;
pub mod common;
pub mod normalize;
pub mod orchestrator;
pub mod reconcile;

pub use brackets::{BracketSchedule, BracketTax};
pub use normalize::{RateRange, RoundingRule, clamp_rate, normalize};
pub use orchestrator::{CalculationError, calculate, calculate_from_book};
pub use reconcile::{Reconciliation, ReliefReconciler};
