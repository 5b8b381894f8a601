use crate::app::services::response_parser::normalize::{
    digits_only, normalize_address, normalize_date,
};
use crate::constants::CANONICAL_CITY;

#[test]
fn test_known_city_aliases_collapse_to_canonical_form() {
    for alias in ["BDR", "B/dar", "B/dr", "Bahirdar", "Bahir dar", "bahir dar"] {
        assert_eq!(
            normalize_address(alias),
            CANONICAL_CITY,
            "alias '{}' should normalize",
            alias
        );
    }
}

#[test]
fn test_city_normalization_is_idempotent() {
    let once = normalize_address("Bahir Dar");
    assert_eq!(once, CANONICAL_CITY);
    assert_eq!(normalize_address(&once), CANONICAL_CITY);
}

#[test]
fn test_unknown_address_passes_through_trimmed() {
    assert_eq!(normalize_address("  Gondar  "), "Gondar");
    assert_eq!(normalize_address("Addis Ababa"), "Addis Ababa");
}

#[test]
fn test_alias_inside_longer_address_still_collapses() {
    assert_eq!(normalize_address("kebele 05, bdr"), CANONICAL_CITY);
}

#[test]
fn test_full_date_is_zero_padded() {
    assert_eq!(normalize_date("5/8/2015"), Some("05/08/2015".to_string()));
    assert_eq!(normalize_date("15/08/2015"), Some("15/08/2015".to_string()));
}

#[test]
fn test_day_month_date_gets_default_year() {
    assert_eq!(normalize_date("5/8"), Some("05/08/2017".to_string()));
}

#[test]
fn test_bare_day_gets_default_month_and_year() {
    assert_eq!(normalize_date("7"), Some("07/01/2017".to_string()));
}

#[test]
fn test_unrecognized_date_shapes_are_none() {
    assert_eq!(normalize_date("2015-08-15"), None);
    assert_eq!(normalize_date("15/08/15"), None);
    assert_eq!(normalize_date("yesterday"), None);
    assert_eq!(normalize_date(""), None);
}

#[test]
fn test_digits_only_strips_punctuation() {
    assert_eq!(digits_only("ke-05."), "05");
    assert_eq!(digits_only("no digits"), "");
    assert_eq!(digits_only("17"), "17");
}
