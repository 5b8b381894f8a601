//! Tagged extraction from well-formed markup
//!
//! The model is asked to wrap each field in an open/close tag pair
//! (`<age>34</age>`). This module locates those pairs and screens the inner
//! text through the field's normalizer and acceptance check. A value that
//! fails screening is discarded rather than raised; the caller logs the
//! rejection and treats the field as not found.

use crate::app::models::CardField;
use crate::app::services::record_validator::rules;
use regex::Regex;
use std::sync::LazyLock;

use super::normalize::{digits_only, normalize_address, normalize_date};

/// One `(?s)<tag>(.*?)</tag>` matcher per field, in record order
static TAG_PATTERNS: LazyLock<Vec<(CardField, Regex)>> = LazyLock::new(|| {
    CardField::ALL
        .iter()
        .map(|field| {
            let pattern = format!(r"(?s)<{tag}>(.*?)</{tag}>", tag = field.tag());
            (
                *field,
                Regex::new(&pattern).expect("invalid tag pattern"),
            )
        })
        .collect()
});

/// True when any recognized open/close tag pair appears in the reply.
///
/// This is the all-or-nothing fallback gate: pattern fallback only engages
/// when the reply carries no recognized markup whatsoever, so a
/// malformed-but-tagged reply is never mixed with pattern guesses.
/// Unrecognized tags do not count.
pub fn has_any_markup(text: &str) -> bool {
    TAG_PATTERNS.iter().any(|(_, pattern)| pattern.is_match(text))
}

/// Extract the trimmed inner text of a field's tag pair, if present
pub fn extract(field: CardField, text: &str) -> Option<String> {
    TAG_PATTERNS
        .iter()
        .find(|(f, _)| *f == field)
        .and_then(|(_, pattern)| pattern.captures(text))
        .map(|caps| caps[1].trim().to_string())
}

/// Screen a tagged raw value through the field's normalizer and acceptance
/// check.
///
/// Returns `Ok(Some(value))` with the normalized value on acceptance,
/// `Ok(None)` when the content is blank (simply not found), and
/// `Err(reason)` when the content was present but rejected.
pub fn screen(field: CardField, raw: &str) -> Result<Option<String>, String> {
    match field {
        // Name, age, and address only need non-blank content at this stage;
        // the two-token name rule and the digit/range age rules stay in the
        // validator so its message list can distinguish "not found" from
        // "present but malformed".
        CardField::PatientName | CardField::Age => {
            if raw.is_empty() {
                Ok(None)
            } else {
                Ok(Some(raw.to_string()))
            }
        }

        CardField::Address => {
            if raw.is_empty() {
                Ok(None)
            } else {
                Ok(Some(normalize_address(raw)))
            }
        }

        CardField::Sex => {
            if raw.is_empty() {
                Ok(None)
            } else if rules::is_valid_sex(raw) {
                Ok(Some(raw.to_string()))
            } else {
                Err(format!("value '{}' is not 'M' or 'F'", raw))
            }
        }

        CardField::Telephone => {
            if raw.is_empty() {
                Ok(None)
            } else if rules::is_valid_telephone(raw) {
                Ok(Some(raw.to_string()))
            } else {
                Err(format!("value '{}' is not exactly 10 digits", raw))
            }
        }

        // A blank kebele tag is an acceptable-absent value and is kept as
        // the empty string; otherwise the digits must form a 01-17 code.
        CardField::Kebele => {
            let numeric = digits_only(raw);
            if numeric.is_empty() {
                Ok(Some(String::new()))
            } else if rules::is_valid_kebele(&numeric) {
                Ok(Some(numeric))
            } else {
                Err(format!(
                    "value '{}' is not a valid kebele (must be 01-17 or blank)",
                    raw
                ))
            }
        }

        CardField::Date => {
            if raw.is_empty() {
                Ok(None)
            } else {
                match normalize_date(raw) {
                    Some(normalized) if rules::is_valid_date(&normalized) => Ok(Some(normalized)),
                    Some(normalized) => Err(format!(
                        "value '{}' (normalized '{}') is not a valid Ethiopian date",
                        raw, normalized
                    )),
                    None => Err(format!("value '{}' is not a recognized date shape", raw)),
                }
            }
        }
    }
}
