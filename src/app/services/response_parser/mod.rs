//! Parser for the vision model's free-text reply
//!
//! This module turns a raw, unreliable natural-language string into a
//! structured [`ExtractionRecord`](crate::app::models::ExtractionRecord),
//! preferring well-formed tagged markup and degrading through prioritized
//! regex fallbacks only when the reply carries no markup at all.
//!
//! ## Architecture
//!
//! - [`parser`] - Orchestration, fallback gate, and panic boundary
//! - [`tagged`] - Tag-pair location and per-field acceptance screening
//! - [`fallback`] - Prioritized pattern lists for untagged replies
//! - [`normalize`] - Pure canonicalization helpers
//! - [`stats`] - Parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use medcard_processor::app::services::response_parser::ResponseParser;
//!
//! let parser = ResponseParser::with_defaults();
//! let record = parser.parse("<age>34</age><sex>M</sex>");
//! assert_eq!(record.age.as_deref(), Some("34"));
//! ```

pub mod fallback;
pub mod normalize;
pub mod parser;
pub mod stats;
pub mod tagged;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use parser::ResponseParser;
pub use stats::{ParseOutcome, ParseStats};
