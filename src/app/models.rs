//! Data models for medical card extraction
//!
//! This module contains the core data structures for representing an
//! extracted card record, the set of fields a deployment extracts, and the
//! provenance-tagged record handed to the exporter.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Card Fields
// =============================================================================

/// The fields a medical card can yield, in record order.
///
/// The order here is load-bearing: the validator walks fields in this order
/// so its message list is deterministic across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardField {
    PatientName,
    Age,
    Sex,
    Telephone,
    Address,
    Kebele,
    Date,
}

impl CardField {
    /// All fields in record order
    pub const ALL: &[CardField] = &[
        CardField::PatientName,
        CardField::Age,
        CardField::Sex,
        CardField::Telephone,
        CardField::Address,
        CardField::Kebele,
        CardField::Date,
    ];

    /// The markup tag name the model is asked to wrap this field in
    pub fn tag(&self) -> &'static str {
        match self {
            CardField::PatientName => "patient_name",
            CardField::Age => "age",
            CardField::Sex => "sex",
            CardField::Telephone => "telephone",
            CardField::Address => "address",
            CardField::Kebele => "kebele",
            CardField::Date => "date",
        }
    }

    /// Human-readable field name used in diagnostics and reports
    pub fn display_name(&self) -> &'static str {
        match self {
            CardField::PatientName => "patient name",
            CardField::Age => "age",
            CardField::Sex => "sex",
            CardField::Telephone => "telephone",
            CardField::Address => "address",
            CardField::Kebele => "kebele",
            CardField::Date => "date",
        }
    }
}

impl fmt::Display for CardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CardField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "patient_name" | "patient-name" | "name" => Ok(CardField::PatientName),
            "age" => Ok(CardField::Age),
            "sex" => Ok(CardField::Sex),
            "telephone" | "phone" => Ok(CardField::Telephone),
            "address" => Ok(CardField::Address),
            "kebele" => Ok(CardField::Kebele),
            "date" => Ok(CardField::Date),
            other => Err(Error::data_validation(format!(
                "Unknown field '{}'. Available fields: patient_name, age, sex, telephone, address, kebele, date",
                other
            ))),
        }
    }
}

/// Where a field value came from during parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// Extracted from a well-formed open/close tag pair
    Tag,
    /// Recovered by a fallback pattern from untagged text
    Pattern,
}

// =============================================================================
// Extraction Record
// =============================================================================

/// A structured record parsed from one model reply.
///
/// Every field is independently optional; `None` means the field was either
/// never found or was extracted and rejected. The record is immutable after
/// validation (validation only inspects it and returns diagnostics).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,

    /// "M" or "F" only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,

    /// 10-digit string, conventionally starting "09"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// 2-digit code 01-17, or empty when the tag was present but blank
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kebele: Option<String>,

    /// Ethiopian date, normalized to DD/MM/YYYY at parse time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl ExtractionRecord {
    /// Create a record with every field null
    pub fn empty() -> Self {
        Self::default()
    }

    /// True if no field carries a value
    pub fn is_empty(&self) -> bool {
        CardField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Read a field by name
    pub fn get(&self, field: CardField) -> Option<&str> {
        match field {
            CardField::PatientName => self.patient_name.as_deref(),
            CardField::Age => self.age.as_deref(),
            CardField::Sex => self.sex.as_deref(),
            CardField::Telephone => self.telephone.as_deref(),
            CardField::Address => self.address.as_deref(),
            CardField::Kebele => self.kebele.as_deref(),
            CardField::Date => self.date.as_deref(),
        }
    }

    /// Set a field by name
    pub fn set(&mut self, field: CardField, value: String) {
        let slot = match field {
            CardField::PatientName => &mut self.patient_name,
            CardField::Age => &mut self.age,
            CardField::Sex => &mut self.sex,
            CardField::Telephone => &mut self.telephone,
            CardField::Address => &mut self.address,
            CardField::Kebele => &mut self.kebele,
            CardField::Date => &mut self.date,
        };
        *slot = Some(value);
    }
}

// =============================================================================
// Provenance-Tagged Record
// =============================================================================

/// An extraction record tied to the image it came from.
///
/// The filename is attached by the pipeline after parsing; it is not part of
/// the parse itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(flatten)]
    pub extraction: ExtractionRecord,

    /// Basename of the originating image file
    pub image_filename: String,
}

impl CardRecord {
    /// Attach provenance to a parsed record
    pub fn new(extraction: ExtractionRecord, image_filename: impl Into<String>) -> Self {
        Self {
            extraction,
            image_filename: image_filename.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_order_matches_record_order() {
        assert_eq!(CardField::ALL[0], CardField::PatientName);
        assert_eq!(CardField::ALL[6], CardField::Date);
        assert_eq!(CardField::ALL.len(), 7);
    }

    #[test]
    fn field_from_str_accepts_aliases() {
        assert_eq!(
            CardField::from_str("patient_name").unwrap(),
            CardField::PatientName
        );
        assert_eq!(CardField::from_str("Phone").unwrap(), CardField::Telephone);
        assert_eq!(CardField::from_str(" age ").unwrap(), CardField::Age);
        assert!(CardField::from_str("card_number").is_err());
    }

    #[test]
    fn empty_record_reports_empty() {
        let record = ExtractionRecord::empty();
        assert!(record.is_empty());
    }

    #[test]
    fn record_with_one_field_is_not_empty() {
        let mut record = ExtractionRecord::empty();
        record.set(CardField::Age, "34".to_string());
        assert!(!record.is_empty());
        assert_eq!(record.get(CardField::Age), Some("34"));
        assert_eq!(record.get(CardField::Sex), None);
    }

    #[test]
    fn card_record_carries_provenance() {
        let mut extraction = ExtractionRecord::empty();
        extraction.set(CardField::Sex, "F".to_string());
        let card = CardRecord::new(extraction, "card_001.jpg");
        assert_eq!(card.image_filename, "card_001.jpg");
        assert_eq!(card.extraction.get(CardField::Sex), Some("F"));
    }
}
