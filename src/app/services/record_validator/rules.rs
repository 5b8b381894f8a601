//! Per-field acceptance predicates
//!
//! Pure functions shared by the validator's aggregate verdict and the
//! parser's tagged-extraction acceptance checks. Each predicate answers
//! "is this value acceptable when present"; absence is handled by callers.

use crate::constants::{TELEPHONE_DIGITS, age_bounds, ethiopian_calendar, kebele_bounds};
use regex::Regex;
use std::sync::LazyLock;

use super::super::response_parser::normalize::digits_only;

static TEN_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("invalid telephone pattern"));

static DATE_TRIPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("invalid date pattern"));

/// A patient name must carry at least a first and last name
pub fn has_full_name(name: &str) -> bool {
    name.split_whitespace().count() >= 2
}

/// True when the value is all-digit; compound expressions ("2 years
/// 3 months") fail here and surface as a validation message
pub fn is_numeric_age(age: &str) -> bool {
    !age.is_empty() && age.chars().all(|c| c.is_ascii_digit())
}

/// Ages must lie strictly inside the reasonable range
pub fn is_age_in_range(age: u32) -> bool {
    age > age_bounds::MIN_EXCLUSIVE && age < age_bounds::MAX_EXCLUSIVE
}

/// Sex is a two-value enumeration, nothing else
pub fn is_valid_sex(sex: &str) -> bool {
    sex == "M" || sex == "F"
}

/// Telephone numbers are exactly 10 digits
pub fn is_valid_telephone(telephone: &str) -> bool {
    telephone.len() == TELEPHONE_DIGITS && TEN_DIGITS.is_match(telephone)
}

/// A kebele is valid when blank, or when its digits form a 2-digit code in
/// the 01-17 range. Non-digit characters are stripped before checking.
pub fn is_valid_kebele(kebele: &str) -> bool {
    let numeric = digits_only(kebele);
    if numeric.is_empty() {
        return true;
    }
    if numeric.len() != kebele_bounds::DIGITS {
        return false;
    }
    match numeric.parse::<u32>() {
        Ok(value) => (kebele_bounds::MIN..=kebele_bounds::MAX).contains(&value),
        Err(_) => false,
    }
}

/// A bare day of month, accepted when the model returned only the day
pub fn is_valid_day(day: u32) -> bool {
    (1..=ethiopian_calendar::DAYS_PER_MONTH).contains(&day)
}

/// Validate a full `DD/MM/YYYY` triple against Ethiopian calendar bounds:
/// day 1-30, month 1-13, 4-digit year, and the short 13th month (Pagume)
/// capping the day at 6.
pub fn is_valid_ethiopian_date(date: &str) -> bool {
    let Some(caps) = DATE_TRIPLE.captures(date) else {
        return false;
    };

    let (Ok(day), Ok(month), Ok(year)) = (
        caps[1].parse::<u32>(),
        caps[2].parse::<u32>(),
        caps[3].parse::<u32>(),
    ) else {
        return false;
    };

    if !(1..=ethiopian_calendar::DAYS_PER_MONTH).contains(&day) {
        return false;
    }
    if !(1..=ethiopian_calendar::MONTHS_PER_YEAR).contains(&month) {
        return false;
    }
    if !(ethiopian_calendar::MIN_YEAR..=ethiopian_calendar::MAX_YEAR).contains(&year) {
        return false;
    }
    if month == ethiopian_calendar::MONTHS_PER_YEAR && day > ethiopian_calendar::PAGUME_MAX_DAY {
        return false;
    }

    true
}

/// A date value is acceptable as either a bare day 1-30 or a full triple;
/// the data model admits both forms
pub fn is_valid_date(date: &str) -> bool {
    if !date.is_empty() && date.chars().all(|c| c.is_ascii_digit()) {
        return date.parse::<u32>().map(is_valid_day).unwrap_or(false);
    }
    is_valid_ethiopian_date(date)
}
