//! Injected diagnostics collaborator for the parser and validator.
//!
//! The parser and validator report every per-field decision (found via tag,
//! found via pattern, extracted-but-rejected, never found) through this
//! trait instead of a process-global logger, so unit tests can observe the
//! distinction between "rejected" and "missing" without capturing process
//! output. The default implementation forwards to `tracing`.

use crate::app::models::{CardField, FieldSource};
use std::sync::Mutex;
use tracing::{error, info, warn};

/// Sink for per-field parsing and validation events
pub trait Diagnostics: Send + Sync {
    /// A field value was extracted and accepted
    fn field_extracted(&self, field: CardField, source: FieldSource, value: &str);

    /// A candidate value was extracted but failed its acceptance check;
    /// the field collapses to null, but observably so
    fn field_rejected(&self, field: CardField, source: FieldSource, raw: &str, reason: &str);

    /// No candidate value was found anywhere in the text
    fn field_missing(&self, field: CardField);

    /// A validation warning that does not fail the record
    fn validation_warning(&self, message: &str);
}

/// Default diagnostics sink emitting structured `tracing` events
#[derive(Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn field_extracted(&self, field: CardField, source: FieldSource, value: &str) {
        match source {
            FieldSource::Tag => {
                info!("Extracted {} from tags: '{}'", field.display_name(), value)
            }
            FieldSource::Pattern => {
                info!(
                    "Extracted {} via fallback pattern: '{}'",
                    field.display_name(),
                    value
                )
            }
        }
    }

    fn field_rejected(&self, field: CardField, _source: FieldSource, raw: &str, reason: &str) {
        warn!(
            "Extracted {} value '{}' rejected: {}",
            field.display_name(),
            raw,
            reason
        );
    }

    fn field_missing(&self, field: CardField) {
        error!(
            "Failed to extract any potential {} value",
            field.display_name()
        );
    }

    fn validation_warning(&self, message: &str) {
        warn!("{}", message);
    }
}

/// A recorded diagnostic event, for test assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    Extracted {
        field: CardField,
        source: FieldSource,
        value: String,
    },
    Rejected {
        field: CardField,
        source: FieldSource,
        raw: String,
        reason: String,
    },
    Missing {
        field: CardField,
    },
    Warning {
        message: String,
    },
}

/// Diagnostics sink that records events in memory.
///
/// Used by the observability tests to assert that a tagged value which failed
/// its acceptance check is reported as rejected rather than missing.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, in emission order
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().expect("diagnostics lock poisoned").clone()
    }

    /// True if a rejection was recorded for the given field
    pub fn rejected(&self, field: CardField) -> bool {
        self.events()
            .iter()
            .any(|e| matches!(e, DiagnosticEvent::Rejected { field: f, .. } if *f == field))
    }

    /// True if the field was reported as never found
    pub fn missing(&self, field: CardField) -> bool {
        self.events()
            .iter()
            .any(|e| matches!(e, DiagnosticEvent::Missing { field: f } if *f == field))
    }

    /// Recorded validation warnings
    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DiagnosticEvent::Warning { message } => Some(message),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: DiagnosticEvent) {
        self.events
            .lock()
            .expect("diagnostics lock poisoned")
            .push(event);
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn field_extracted(&self, field: CardField, source: FieldSource, value: &str) {
        self.push(DiagnosticEvent::Extracted {
            field,
            source,
            value: value.to_string(),
        });
    }

    fn field_rejected(&self, field: CardField, source: FieldSource, raw: &str, reason: &str) {
        self.push(DiagnosticEvent::Rejected {
            field,
            source,
            raw: raw.to_string(),
            reason: reason.to_string(),
        });
    }

    fn field_missing(&self, field: CardField) {
        self.push(DiagnosticEvent::Missing { field });
    }

    fn validation_warning(&self, message: &str) {
        self.push(DiagnosticEvent::Warning {
            message: message.to_string(),
        });
    }
}
