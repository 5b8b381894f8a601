//! Per-field canonicalization for extracted values
//!
//! Normalizers are pure string-to-string functions applied between
//! extraction and acceptance: address spelling variants collapse to one
//! canonical form, partial Ethiopian dates are zero-padded and completed
//! with fixed defaults, and kebele values are reduced to their digits.

use crate::constants::{CANONICAL_CITY, date_defaults};
use regex::Regex;
use std::sync::LazyLock;

/// Spelling variants of Bahir Dar seen on real cards, matched
/// case-insensitively on word boundaries
static BAHIR_DAR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bbdr\b",
        r"(?i)\bb/dar\b",
        r"(?i)\bb/dr\b",
        r"(?i)\bbahir\s*dar\b",
        r"(?i)\bbahirdar\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid address pattern"))
    .collect()
});

static FULL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("invalid date pattern"));

static DAY_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})$").expect("invalid date pattern"));

static DAY_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})$").expect("invalid date pattern"));

/// Normalize an address, collapsing known Bahir Dar spelling variants to the
/// canonical form. Any other address passes through trimmed but unchanged.
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    if BAHIR_DAR_PATTERNS.iter().any(|p| p.is_match(trimmed)) {
        CANONICAL_CITY.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Normalize an Ethiopian date to a full, zero-padded `DD/MM/YYYY`.
///
/// Three input shapes are recognized, depending on how much of the date the
/// model returned: a full `D/M/YYYY` triple, a `D/M` pair (year defaults),
/// and a bare day (month and year default). The defaults are the fixed
/// constants in [`date_defaults`], never the current date. Returns `None`
/// for any other shape; range checking is the validator's job.
pub fn normalize_date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    if let Some(caps) = FULL_DATE.captures(trimmed) {
        return Some(format!(
            "{:0>2}/{:0>2}/{}",
            &caps[1], &caps[2], &caps[3]
        ));
    }

    if let Some(caps) = DAY_MONTH.captures(trimmed) {
        return Some(format!(
            "{:0>2}/{:0>2}/{}",
            &caps[1],
            &caps[2],
            date_defaults::DEFAULT_YEAR
        ));
    }

    if let Some(caps) = DAY_ONLY.captures(trimmed) {
        return Some(format!(
            "{:0>2}/{}/{}",
            &caps[1],
            date_defaults::DEFAULT_MONTH,
            date_defaults::DEFAULT_YEAR
        ));
    }

    None
}

/// Strip every non-digit character, tolerating surrounding punctuation in
/// captured kebele values
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}
