//! Core response parser implementation
//!
//! This module provides the parser orchestration: the tagged pass over the
//! reply, the all-or-nothing fallback gate, the per-field fallback chain,
//! and the panic boundary that converts any internal fault into an all-null
//! record.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

use super::fallback;
use super::stats::{ParseOutcome, ParseStats};
use super::tagged;
use crate::app::models::{CardField, ExtractionRecord, FieldSource};
use crate::app::services::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::config::FieldSet;

/// Parser for the vision model's free-text reply
///
/// The parser trusts structure over inference: a reply that followed the
/// requested tag format is never second-guessed by the noisier fallback
/// patterns. Fallback engages only when the reply carries no recognized
/// markup at all.
pub struct ResponseParser {
    fields: FieldSet,
    diagnostics: Arc<dyn Diagnostics>,
}

impl ResponseParser {
    /// Create a parser for the given field set with an injected diagnostics
    /// collaborator
    pub fn new(fields: FieldSet, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            fields,
            diagnostics,
        }
    }

    /// Full-card parser logging through `tracing`
    pub fn with_defaults() -> Self {
        Self::new(FieldSet::all(), Arc::new(TracingDiagnostics))
    }

    /// Parse a raw reply into a structured record.
    ///
    /// Never fails: any internal fault degrades to a record with every
    /// field null, which is the correct contract for a best-effort
    /// text-understanding layer.
    pub fn parse(&self, raw_text: &str) -> ExtractionRecord {
        self.parse_with_stats(raw_text).record
    }

    /// Parse a raw reply, also returning per-field accounting
    pub fn parse_with_stats(&self, raw_text: &str) -> ParseOutcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.parse_inner(raw_text)));

        match result {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Internal parser fault; returning all-null record");
                ParseOutcome {
                    record: ExtractionRecord::empty(),
                    stats: ParseStats::new(self.fields.fields().len()),
                }
            }
        }
    }

    fn parse_inner(&self, text: &str) -> ParseOutcome {
        debug!("Parsing extraction result: '{}'", text);

        let mut record = ExtractionRecord::empty();
        let mut stats = ParseStats::new(self.fields.fields().len());
        stats.markup_present = tagged::has_any_markup(text);

        // Pass 1: tagged extraction for every active field
        for &field in self.fields.fields() {
            let Some(raw) = tagged::extract(field, text) else {
                continue;
            };

            match tagged::screen(field, &raw) {
                Ok(Some(value)) => {
                    self.diagnostics
                        .field_extracted(field, FieldSource::Tag, &value);
                    stats.fields_from_tags += 1;
                    record.set(field, value);
                }
                Ok(None) => {
                    debug!("Tag for {} present but blank, ignoring", field);
                }
                Err(reason) => {
                    self.diagnostics
                        .field_rejected(field, FieldSource::Tag, &raw, &reason);
                    stats.fields_rejected += 1;
                }
            }
        }

        // Pass 2: pattern fallback, gated on the reply carrying no
        // recognized markup whatsoever
        if !stats.markup_present {
            for &field in self.fields.fields() {
                if record.get(field).is_some() {
                    continue;
                }
                if let Some(value) = Self::fallback_for(field, text) {
                    self.diagnostics
                        .field_extracted(field, FieldSource::Pattern, &value);
                    stats.fields_from_patterns += 1;
                    record.set(field, value);
                }
            }

            // Last resort for age only: any integer token in range
            if self.fields.contains(CardField::Age) && record.age.is_none() {
                if let Some(value) = fallback::last_resort_age(text) {
                    self.diagnostics
                        .field_extracted(CardField::Age, FieldSource::Pattern, &value);
                    stats.fields_from_patterns += 1;
                    record.age = Some(value);
                }
            }
        }

        for &field in self.fields.fields() {
            if record.get(field).is_none() {
                self.diagnostics.field_missing(field);
                stats.fields_missing += 1;
            }
        }

        ParseOutcome { record, stats }
    }

    /// The fallback extractor for a field, if one exists. Address and date
    /// have no pattern fallback; they are only trusted from tags.
    fn fallback_for(field: CardField, text: &str) -> Option<String> {
        match field {
            CardField::PatientName => fallback::patient_name(text),
            CardField::Age => fallback::age(text),
            CardField::Sex => fallback::sex(text),
            CardField::Telephone => fallback::telephone(text),
            CardField::Kebele => fallback::kebele(text),
            CardField::Address | CardField::Date => None,
        }
    }
}
