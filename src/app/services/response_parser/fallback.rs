//! Pattern fallback for untagged replies
//!
//! When a reply carries no recognized markup at all, each field is recovered
//! from loose natural-language phrasing through a prioritized pattern list.
//! Each extractor is a pure function over the raw text returning an optional
//! value; the lists are ordered most-specific first and scanning stops at
//! the first pattern whose captured value passes the field's check.

use crate::app::services::record_validator::rules;
use crate::constants::age_bounds;
use regex::Regex;
use std::sync::LazyLock;

use super::normalize::digits_only;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("invalid fallback pattern"))
        .collect()
}

static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        // "name: John Doe" phrasings
        r"(?i)(?:name|patient name|full name)[:\s]*([\w\s]+)",
        // "patient is John Doe" phrasings
        r"(?i)(?:patient|person)\s*(?:is|named)\s*([\w\s]+)",
        // bare two-word name
        r"\b([A-Za-z]+\s+[A-Za-z]+)\b",
    ])
});

/// Recover a patient name; only values that split into exactly two tokens
/// are accepted
pub fn patient_name(text: &str) -> Option<String> {
    for pattern in NAME_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let value = caps[1].trim().to_string();
            if value.split_whitespace().count() == 2 {
                return Some(value);
            }
        }
    }
    None
}

/// Age phrasings, most specific first. Compound expressions ("2 years
/// 3 months", "8 months", "15 days") rank above the bare "N years" pattern
/// so the full expression is captured verbatim.
static AGE_PATTERNS: LazyLock<Vec<(Regex, AgeCapture)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)age[:\s]*(\d+)\b").expect("invalid age pattern"),
            AgeCapture::Group,
        ),
        (
            Regex::new(r"(?i)\b\d+\s*(?:years|year|yrs|yr)\s*(?:and\s*)?\d+\s*(?:months|month)\b")
                .expect("invalid age pattern"),
            AgeCapture::Whole,
        ),
        (
            Regex::new(r"(?i)(\d+)\s*(?:years|year|yrs|yr)\s*old").expect("invalid age pattern"),
            AgeCapture::Group,
        ),
        (
            Regex::new(r"(?i)(\d+)\s*(?:years|year|yrs|yr)\b").expect("invalid age pattern"),
            AgeCapture::Group,
        ),
        (
            Regex::new(r"(?i)\b\d+\s*(?:months|month)\b").expect("invalid age pattern"),
            AgeCapture::Whole,
        ),
        (
            Regex::new(r"(?i)\b\d+\s*(?:days|day)\b").expect("invalid age pattern"),
            AgeCapture::Whole,
        ),
        (
            Regex::new(r"(?i)age[:\s]*is\s*(\d+)").expect("invalid age pattern"),
            AgeCapture::Group,
        ),
        (
            Regex::new(r"(?i)(?:patient|person)\s*is\s*(\d+)\s*(?:years|year|yrs|yr)")
                .expect("invalid age pattern"),
            AgeCapture::Group,
        ),
        (
            Regex::new(r"(?i)(?:patient|person)\s*(?:age|aged)\s*(\d+)")
                .expect("invalid age pattern"),
            AgeCapture::Group,
        ),
        (
            Regex::new(r"(?i)(\d+)\s*(?:yo|y\.o\.)").expect("invalid age pattern"),
            AgeCapture::Group,
        ),
    ]
});

#[derive(Clone, Copy)]
enum AgeCapture {
    /// Take capture group 1 (a bare number)
    Group,
    /// Take the whole match, preserving the compound unit expression
    Whole,
}

/// Recover an age from a reply with no markup.
///
/// A reply that is nothing but digits is taken directly; otherwise the
/// phrasing patterns run in priority order.
pub fn age(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Some(trimmed.to_string());
    }

    for (pattern, capture) in AGE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let value = match capture {
                AgeCapture::Group => caps[1].trim().to_string(),
                AgeCapture::Whole => caps[0].trim().to_string(),
            };
            if !value.is_empty() {
                return Some(value);
            }
        }
    }

    None
}

/// Last-resort heuristic: any integer token in the open interval (0, 120)
/// anywhere in the text
pub fn last_resort_age(text: &str) -> Option<String> {
    static ANY_NUMBER: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(\d+)").expect("invalid number pattern"));

    let caps = ANY_NUMBER.captures(text)?;
    let candidate = caps[1].to_string();
    match candidate.parse::<u32>() {
        Ok(value)
            if value > age_bounds::MIN_EXCLUSIVE && value < age_bounds::MAX_EXCLUSIVE =>
        {
            Some(candidate)
        }
        _ => None,
    }
}

static SEX_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\b(male|female)\b",
        r"(?i)\b(m|f)\b",
        r"(?i)(?:sex|gender)[:\s]*(male|female|m|f)",
        r"(?i)(?:patient|person)\s*is\s*(male|female)",
    ])
});

/// Recover a sex value. Amharic gender glyphs are checked first: "ወ"
/// (wend, male) and "ሴ" (set, female) appear on cards filled in Amharic.
pub fn sex(text: &str) -> Option<String> {
    if text.contains('ወ') {
        return Some("M".to_string());
    }
    if text.contains('ሴ') {
        return Some("F".to_string());
    }

    for pattern in SEX_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let value = match caps[1].to_uppercase().as_str() {
                "MALE" | "M" => "M".to_string(),
                "FEMALE" | "F" => "F".to_string(),
                other => other.to_string(),
            };
            if rules::is_valid_sex(&value) {
                return Some(value);
            }
        }
    }

    None
}

static TELEPHONE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b(\d{10})\b",
        r"(?i)(?:phone|telephone|tel|mobile)[:\s]*(\d{10})",
        r"(?i)(?:phone|telephone|tel|mobile)[:\s]*(?:\+251)?(\d{10})",
        // Ethiopian numbers written with the leading 0 outside the capture;
        // the zero is restored below
        r"0(\d{9})",
    ])
});

/// Recover a 10-digit Ethiopian telephone number. The final pattern captures
/// 9 digits after a leading "0" and reassembles the full number.
pub fn telephone(text: &str) -> Option<String> {
    for (index, pattern) in TELEPHONE_PATTERNS.iter().enumerate() {
        if let Some(caps) = pattern.captures(text) {
            let captured = caps[1].to_string();
            if rules::is_valid_telephone(&captured) {
                return Some(captured);
            }
            let is_split_pattern = index == TELEPHONE_PATTERNS.len() - 1;
            if is_split_pattern && captured.len() == 9 {
                let restored = format!("0{}", captured);
                if rules::is_valid_telephone(&restored) {
                    return Some(restored);
                }
            }
        }
    }
    None
}

static KEBELE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)kebele[:\s]*(\d+)",
        r"(?i)(?:district|area|zone)[:\s]*(\d+)",
        r"(?i)\bkebele\b[^0-9]*(\d+)",
        // "ቀ" is the Amharic abbreviation for kebele seen on cards
        r"(?i)(?:ቀ|bdr)[^0-9]*(\d+)",
    ])
});

static STANDALONE_TWO_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2})\b").expect("invalid kebele pattern"));

/// Recover a kebele code: labeled phrasings first, then any standalone
/// 2-digit token in the valid range
pub fn kebele(text: &str) -> Option<String> {
    for pattern in KEBELE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let numeric = digits_only(&caps[1]);
            if !numeric.is_empty() && rules::is_valid_kebele(&numeric) {
                return Some(numeric);
            }
        }
    }

    for caps in STANDALONE_TWO_DIGITS.captures_iter(text) {
        let candidate = caps[1].to_string();
        if rules::is_valid_kebele(&candidate) {
            return Some(candidate);
        }
    }

    None
}
