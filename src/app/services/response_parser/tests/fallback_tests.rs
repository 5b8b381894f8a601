use crate::app::services::response_parser::fallback::{
    age, kebele, last_resort_age, patient_name, sex, telephone,
};

#[test]
fn test_name_from_labeled_phrasing() {
    assert_eq!(
        patient_name("Patient name: Abebe Bekele"),
        Some("Abebe Bekele".to_string())
    );
    assert_eq!(
        patient_name("the patient is Almaz Tadesse"),
        Some("Almaz Tadesse".to_string())
    );
}

#[test]
fn test_name_requires_exactly_two_tokens() {
    assert_eq!(patient_name("name: Abebe"), None);
    assert_eq!(patient_name("12345"), None);
}

#[test]
fn test_age_direct_digit_reply() {
    assert_eq!(age("34"), Some("34".to_string()));
    assert_eq!(age("  42  "), Some("42".to_string()));
}

#[test]
fn test_age_from_phrasings() {
    assert_eq!(age("Age: 34"), Some("34".to_string()));
    assert_eq!(age("the patient is 34 years old"), Some("34".to_string()));
}

#[test]
fn test_age_compound_expressions_kept_verbatim() {
    assert_eq!(age("2 years 3 months"), Some("2 years 3 months".to_string()));
    assert_eq!(age("8 months"), Some("8 months".to_string()));
    assert_eq!(age("15 days"), Some("15 days".to_string()));
}

#[test]
fn test_compound_age_outranks_bare_years() {
    // the whole compound expression wins over its leading "2 years"
    assert_eq!(
        age("aged 2 years and 3 months"),
        Some("2 years and 3 months".to_string())
    );
}

#[test]
fn test_last_resort_age_bounds() {
    assert_eq!(last_resort_age("noise 42 noise"), Some("42".to_string()));
    assert_eq!(last_resort_age("0"), None);
    assert_eq!(last_resort_age("120"), None);
    assert_eq!(last_resort_age("no numbers here"), None);
}

#[test]
fn test_sex_amharic_glyphs_checked_first() {
    assert_eq!(sex("ወ"), Some("M".to_string()));
    assert_eq!(sex("ሴ"), Some("F".to_string()));
    assert_eq!(sex("sex: ሴ female"), Some("F".to_string()));
}

#[test]
fn test_sex_english_phrasings_map_to_single_letter() {
    assert_eq!(sex("the patient is male"), Some("M".to_string()));
    assert_eq!(sex("Female"), Some("F".to_string()));
    assert_eq!(sex("sex: f"), Some("F".to_string()));
    assert_eq!(sex("unknown"), None);
}

#[test]
fn test_telephone_ten_digit_token() {
    assert_eq!(telephone("call 0912345678 anytime"), Some("0912345678".to_string()));
    assert_eq!(telephone("phone: 0912345678"), Some("0912345678".to_string()));
}

#[test]
fn test_telephone_restores_split_leading_zero() {
    // the country-code form carries the local number as 0 plus 9 digits
    assert_eq!(telephone("+2510912345678"), Some("0912345678".to_string()));
}

#[test]
fn test_telephone_rejects_wrong_lengths() {
    assert_eq!(telephone("091234567"), None);
    assert_eq!(telephone("no phone recorded"), None);
}

#[test]
fn test_kebele_labeled_phrasings() {
    assert_eq!(kebele("Kebele: 05"), Some("05".to_string()));
    assert_eq!(kebele("kebele 14"), Some("14".to_string()));
}

#[test]
fn test_kebele_standalone_two_digit_scan() {
    assert_eq!(kebele("lives at 05 main road"), Some("05".to_string()));
    // out-of-range standalone tokens are skipped
    assert_eq!(kebele("lives at 42"), None);
    // the scan keeps going past invalid tokens
    assert_eq!(kebele("42 then 07"), Some("07".to_string()));
}
