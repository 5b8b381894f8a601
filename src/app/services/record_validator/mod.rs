//! Record validation module
//!
//! Given an assembled [`ExtractionRecord`](crate::app::models::ExtractionRecord),
//! produces an overall pass/fail verdict plus an ordered list of
//! human-readable complaint messages. Validation is pure: it inspects the
//! record and returns diagnostics, never mutating fields or raising.
//!
//! - [`validator`] - `RecordValidator` and the aggregate verdict
//! - [`rules`] - pure per-field acceptance predicates, shared with the
//!   parser's tagged-extraction screening

pub mod rules;
pub mod validator;


// Re-export main types for easy access
pub use validator::{RecordValidator, ValidationReport};
