//! Configuration management and validation.
//!
//! Provides configuration structures for the vision API, image processing,
//! and export settings, plus the field-set configuration that controls which
//! card fields a deployment extracts. Defaults come from [`crate::constants`]
//! and can be overridden by environment variables and CLI arguments.

use crate::app::models::CardField;
use crate::constants::{
    API_KEY_ENV_VAR, DEFAULT_IMAGE_DIR, DEFAULT_INTER_REQUEST_DELAY_MS, DEFAULT_MAX_RETRIES,
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL_NAME, DEFAULT_OUTPUT_DIR, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RETRY_DELAY_SECS, DEFAULT_TEMPERATURE, OPENROUTER_API_URL,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Vision API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bearer token for OpenRouter; read from the environment, never a file
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Chat-completions endpoint
    pub base_url: String,

    /// Model identifier requested from the provider
    pub model: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum attempts per image when rate limited
    pub max_retries: u32,

    /// Fallback wait when a 429 carries no Retry-After header
    pub retry_delay_secs: u64,

    /// Reply token budget
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: OPENROUTER_API_URL.to_string(),
            model: DEFAULT_MODEL_NAME.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Image processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Directory scanned for card images
    pub image_dir: PathBuf,

    /// Pause between consecutive API calls
    pub inter_request_delay_ms: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            inter_request_delay_ms: DEFAULT_INTER_REQUEST_DELAY_MS,
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for generated files; created if missing
    pub output_dir: PathBuf,

    /// Explicit output file path; overrides the date-stamped default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_file: None,
        }
    }
}

/// The set of card fields a deployment extracts.
///
/// Earlier revisions of this pipeline extracted only the age, then age+sex,
/// then the full card. Rather than maintaining parallel parser copies, one
/// parser consults this set and skips inactive fields entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet {
    active: Vec<CardField>,
}

impl FieldSet {
    /// A field set with every card field active
    pub fn all() -> Self {
        Self {
            active: CardField::ALL.to_vec(),
        }
    }

    /// Build from an explicit field list, preserving record order and
    /// dropping duplicates
    pub fn from_fields(fields: &[CardField]) -> Self {
        let active = CardField::ALL
            .iter()
            .copied()
            .filter(|f| fields.contains(f))
            .collect();
        Self { active }
    }

    /// Whether a field should be extracted
    pub fn contains(&self, field: CardField) -> bool {
        self.active.contains(&field)
    }

    /// Active fields in record order
    pub fn fields(&self) -> &[CardField] {
        &self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::all()
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub processing: ProcessingConfig,
    pub export: ExportConfig,
    pub fields: FieldSet,
}

impl Config {
    /// Build a configuration from defaults plus environment overrides.
    ///
    /// Recognized variables: `OPENROUTER_API_KEY`, `MEDCARD_IMAGE_DIR`,
    /// `MEDCARD_OUTPUT_DIR`, `MEDCARD_MODEL`.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(key) = std::env::var(API_KEY_ENV_VAR) {
            if !key.trim().is_empty() {
                config.api.api_key = Some(key);
            }
        }
        if let Ok(dir) = std::env::var("MEDCARD_IMAGE_DIR") {
            config.processing.image_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("MEDCARD_OUTPUT_DIR") {
            config.export.output_dir = PathBuf::from(dir);
        }
        if let Ok(model) = std::env::var("MEDCARD_MODEL") {
            config.api.model = model;
        }

        debug!(
            "Configuration from environment: model={}, image_dir={}, output_dir={}",
            config.api.model,
            config.processing.image_dir.display(),
            config.export.output_dir.display()
        );

        config
    }

    /// Validate the configuration for the batch processing command.
    ///
    /// The parse-only command needs no API key, so key presence is checked
    /// here rather than at construction time.
    pub fn validate_for_processing(&self) -> Result<()> {
        match &self.api.api_key {
            Some(key) if !key.trim().is_empty() => {}
            _ => {
                return Err(Error::configuration(format!(
                    "OpenRouter API key not provided (set {})",
                    API_KEY_ENV_VAR
                )));
            }
        }

        if self.fields.is_empty() {
            return Err(Error::configuration(
                "Field set is empty; at least one field must be active".to_string(),
            ));
        }

        if self.api.max_retries == 0 {
            return Err(Error::configuration(
                "max_retries must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_field_set_is_full_card() {
        let fields = FieldSet::default();
        for field in CardField::ALL {
            assert!(fields.contains(*field));
        }
    }

    #[test]
    fn field_set_preserves_record_order() {
        let fields = FieldSet::from_fields(&[CardField::Sex, CardField::Age, CardField::Age]);
        assert_eq!(fields.fields(), &[CardField::Age, CardField::Sex]);
    }

    #[test]
    fn field_set_skips_inactive_fields() {
        let fields = FieldSet::from_fields(&[CardField::Age]);
        assert!(fields.contains(CardField::Age));
        assert!(!fields.contains(CardField::Telephone));
    }

    #[test]
    fn validation_requires_api_key() {
        let config = Config::default();
        assert!(config.validate_for_processing().is_err());

        let mut config = Config::default();
        config.api.api_key = Some("sk-test".to_string());
        assert!(config.validate_for_processing().is_ok());
    }

    #[test]
    fn validation_rejects_empty_field_set() {
        let mut config = Config::default();
        config.api.api_key = Some("sk-test".to_string());
        config.fields = FieldSet::from_fields(&[]);
        assert!(config.validate_for_processing().is_err());
    }
}
