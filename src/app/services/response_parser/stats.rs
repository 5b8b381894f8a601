//! Parsing statistics and result structures
//!
//! This module provides types for tracking where each field value came from
//! and organizing parsed results for downstream processing.

use crate::app::models::ExtractionRecord;

/// Parsing result with the assembled record and basic statistics
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// The assembled record, with nulls for missing fields
    pub record: ExtractionRecord,

    /// Per-field accounting for this parse
    pub stats: ParseStats,
}

/// Simple parsing statistics
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ParseStats {
    /// Number of fields the active field set asked for
    pub fields_requested: usize,

    /// Fields taken from well-formed tag pairs
    pub fields_from_tags: usize,

    /// Fields recovered by fallback patterns
    pub fields_from_patterns: usize,

    /// Candidate values extracted but rejected by an acceptance check
    pub fields_rejected: usize,

    /// Fields with no candidate value anywhere in the text
    pub fields_missing: usize,

    /// Whether the reply carried any recognized markup
    pub markup_present: bool,
}

impl ParseStats {
    pub fn new(fields_requested: usize) -> Self {
        Self {
            fields_requested,
            ..Default::default()
        }
    }

    /// Fraction of requested fields that were populated, as a percentage
    pub fn completeness(&self) -> f64 {
        if self.fields_requested == 0 {
            0.0
        } else {
            let found = self.fields_from_tags + self.fields_from_patterns;
            (found as f64 / self.fields_requested as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness_of_empty_request_is_zero() {
        assert_eq!(ParseStats::new(0).completeness(), 0.0);
    }

    #[test]
    fn completeness_counts_both_sources() {
        let stats = ParseStats {
            fields_requested: 4,
            fields_from_tags: 1,
            fields_from_patterns: 1,
            ..Default::default()
        };
        assert!((stats.completeness() - 50.0).abs() < f64::EPSILON);
    }
}
