//! Aggregate record validation
//!
//! Produces a pass/fail verdict plus an ordered list of human-readable
//! complaint messages for an assembled record. The check order is fixed
//! (name, age, sex, telephone, kebele, date) so the message list is
//! deterministic and reproducible for identical input across runs.

use std::sync::Arc;
use tracing::{info, warn};

use super::rules;
use crate::app::models::ExtractionRecord;
use crate::app::services::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::constants::TELEPHONE_PREFIX;

/// Validation verdict with ordered diagnostics
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationReport {
    /// Overall verdict; false if any rule failed
    pub is_valid: bool,

    /// One message per failed rule, in fixed field-check order
    pub messages: Vec<String>,
}

impl ValidationReport {
    fn valid() -> Self {
        Self {
            is_valid: true,
            messages: Vec::new(),
        }
    }

    fn fail(&mut self, message: String) {
        self.is_valid = false;
        self.messages.push(message);
    }
}

/// Validator for assembled extraction records
///
/// A pure inspector: validation never mutates the record, and an invalid
/// record is reported through diagnostics rather than raised. Callers
/// decide whether to keep it.
pub struct RecordValidator {
    diagnostics: Arc<dyn Diagnostics>,
}

impl RecordValidator {
    pub fn new(diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self { diagnostics }
    }

    /// Validator logging through `tracing`
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(TracingDiagnostics))
    }

    /// Validate a record against the domain rules.
    ///
    /// Name, age, and sex are required; telephone, kebele, and date are
    /// optional and only checked when present. The "09" telephone prefix
    /// convention is a warning, never a failure.
    pub fn validate(&self, record: &ExtractionRecord) -> ValidationReport {
        let mut report = ValidationReport::valid();

        match record.patient_name.as_deref() {
            None | Some("") => {
                report.fail("Patient name not found in the extracted data".to_string());
            }
            Some(name) => {
                let name = name.trim();
                if !rules::has_full_name(name) {
                    report.fail(format!(
                        "Patient name '{}' doesn't contain both first and last name",
                        name
                    ));
                }
            }
        }

        match record.age.as_deref() {
            None | Some("") => {
                report.fail("Age not found in the extracted data".to_string());
            }
            Some(age) => {
                if !rules::is_numeric_age(age) {
                    report.fail(format!("Age value is not a valid number: {}", age));
                } else {
                    match age.parse::<u32>() {
                        Ok(value) if rules::is_age_in_range(value) => {}
                        Ok(value) => {
                            report.fail(format!("Age value {} is outside reasonable range", value));
                        }
                        Err(_) => {
                            report.fail(format!("Age value is not a valid number: {}", age));
                        }
                    }
                }
            }
        }

        match record.sex.as_deref() {
            None | Some("") => {
                report.fail("Sex not found in the extracted data".to_string());
            }
            Some(sex) => {
                if !rules::is_valid_sex(sex) {
                    report.fail(format!("Sex value '{}' is not 'M' or 'F'", sex));
                }
            }
        }

        if let Some(telephone) = record.telephone.as_deref() {
            if !telephone.is_empty() {
                if !rules::is_valid_telephone(telephone) {
                    report.fail(format!(
                        "Telephone number '{}' is not exactly 10 digits",
                        telephone
                    ));
                } else if !telephone.starts_with(TELEPHONE_PREFIX) {
                    self.diagnostics.validation_warning(&format!(
                        "Telephone number '{}' does not start with '{}', which is typical for Ethiopian numbers",
                        telephone, TELEPHONE_PREFIX
                    ));
                }
            }
        }

        if let Some(kebele) = record.kebele.as_deref() {
            if !kebele.is_empty() && !rules::is_valid_kebele(kebele) {
                report.fail(format!(
                    "Kebele '{}' is not valid (must be 01-17 or blank)",
                    kebele
                ));
            }
        }

        if let Some(date) = record.date.as_deref() {
            if !date.is_empty() && !rules::is_valid_date(date) {
                report.fail(format!(
                    "Date '{}' is not a valid Ethiopian calendar date",
                    date
                ));
            }
        }

        if report.is_valid {
            info!("Data validation passed");
        } else {
            warn!("Data validation failed: {}", report.messages.join(", "));
        }

        report
    }
}
