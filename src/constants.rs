//! Application constants for the medical card processor
//!
//! This module contains all configuration constants, default values,
//! and domain bounds used throughout the application.

// =============================================================================
// Image Discovery
// =============================================================================

/// Image file extensions accepted for processing (matched case-insensitively)
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Default directory scanned for card images
pub const DEFAULT_IMAGE_DIR: &str = "images";

/// Default directory for generated exports
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Base name for the CSV export; a date stamp and extension are appended
pub const EXPORT_BASENAME: &str = "medical_cards_export";

// =============================================================================
// Vision API
// =============================================================================

/// OpenRouter chat-completions endpoint
pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default vision-language model requested from OpenRouter
pub const DEFAULT_MODEL_NAME: &str = "google/gemini-2.0-flash-001";

/// Environment variable holding the OpenRouter API key
pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

/// Per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Maximum attempts for a single image when the API answers 429
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Fallback wait in seconds when a 429 response carries no Retry-After header
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 5;

/// Pause between consecutive API calls to respect upstream rate limits
pub const DEFAULT_INTER_REQUEST_DELAY_MS: u64 = 1000;

/// Token budget for the model reply; the tagged record is short
pub const DEFAULT_MAX_TOKENS: u32 = 300;

/// Sampling temperature; low for deterministic extraction
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

// =============================================================================
// Domain Bounds
// =============================================================================

/// Age bounds (exclusive on both ends)
pub mod age_bounds {
    /// Ages must be strictly greater than this
    pub const MIN_EXCLUSIVE: u32 = 0;

    /// Ages must be strictly less than this
    pub const MAX_EXCLUSIVE: u32 = 120;
}

/// Kebele code bounds (inclusive); kebele is a 2-digit code or blank
pub mod kebele_bounds {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 17;

    /// Kebele codes are zero-padded to this width
    pub const DIGITS: usize = 2;
}

/// Ethiopian calendar bounds
pub mod ethiopian_calendar {
    /// Months 1-12 have 30 days
    pub const DAYS_PER_MONTH: u32 = 30;

    /// The calendar has 13 months; the 13th is Pagume
    pub const MONTHS_PER_YEAR: u32 = 13;

    /// Pagume has at most 6 days (5 in non-leap years)
    pub const PAGUME_MAX_DAY: u32 = 6;

    /// Accepted 4-digit year range
    pub const MIN_YEAR: u32 = 1000;
    pub const MAX_YEAR: u32 = 9999;
}

/// Defaults applied when the model returns a partial date.
///
/// These are fixed constants, never derived from the clock: a day-only date
/// becomes DD/01/2017 and a day+month date becomes DD/MM/2017.
pub mod date_defaults {
    /// Month substituted when only a day was extracted
    pub const DEFAULT_MONTH: &str = "01";

    /// Year (Ethiopian calendar) substituted when the reply omits one
    pub const DEFAULT_YEAR: &str = "2017";
}

/// Ethiopian telephone numbers are exactly 10 digits
pub const TELEPHONE_DIGITS: usize = 10;

/// Conventional Ethiopian mobile prefix; a mismatch is a warning, not a failure
pub const TELEPHONE_PREFIX: &str = "09";

/// Canonical spelling for the city whose aliases are collapsed
pub const CANONICAL_CITY: &str = "Bahir Dar";

// =============================================================================
// Export Columns
// =============================================================================

/// Fixed output column headers, in sheet order. The final column carries the
/// originating image filename as a provenance tag.
pub const EXPORT_COLUMNS: &[&str] = &[
    "Patient Name",
    "Age",
    "Sex",
    "Telephone",
    "Address",
    "Kebele",
    "Date",
    "Image Filename",
];
