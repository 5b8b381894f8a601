//! Medical Card Processor Library
//!
//! A Rust library for extracting structured patient data from medical card
//! images via a remote vision-language model and exporting validated records
//! to a spreadsheet.
//!
//! This library provides tools for:
//! - Parsing the model's free-text reply into a typed record, preferring
//!   tagged markup and degrading through prioritized regex fallbacks
//! - Normalizing field values (address spelling variants, Ethiopian date
//!   padding and defaults, kebele digit isolation)
//! - Validating records against domain rules with deterministic diagnostics
//! - Discovering and base64-encoding card images for API submission
//! - Writing fixed-column CSV exports with provenance filenames
//! - Comprehensive error handling and recovery

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod diagnostics;
        pub mod image_loader;
        pub mod record_validator;
        pub mod response_parser;
        pub mod sheet_writer;
        pub mod vision_api;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{CardField, CardRecord, ExtractionRecord};
pub use config::Config;

/// Result type alias for the medical card processor
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for medical card processing operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Image could not be loaded or encoded
    #[error("Image encoding error for '{path}': {message}")]
    ImageEncoding { path: String, message: String },

    /// Vision API request failed before a response was received
    #[error("API request error: {message}")]
    ApiRequest {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Vision API returned a non-success status
    #[error("API error (status {status}): {message}")]
    ApiResponse { status: u16, message: String },

    /// Vision API rate limit persisted through all retry attempts
    #[error("Rate limited by API after {attempts} attempts")]
    RateLimitExhausted { attempts: u32 },

    /// Vision API reply had an unexpected shape
    #[error("API response format error: {message}")]
    ResponseFormat { message: String },

    /// Spreadsheet export error
    #[error("Sheet writing error: {message}")]
    SheetWriting {
        message: String,
        #[source]
        source: Option<polars::error::PolarsError>,
    },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an I/O error with a simple message
    pub fn io_error(message: impl Into<String>) -> Self {
        let message_str = message.into();
        Self::Io {
            message: message_str.clone(),
            source: std::io::Error::other(message_str),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an image encoding error
    pub fn image_encoding(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ImageEncoding {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an API request error
    pub fn api_request(message: impl Into<String>, source: Option<reqwest::Error>) -> Self {
        Self::ApiRequest {
            message: message.into(),
            source,
        }
    }

    /// Create an API response error from a status code
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Create a rate limit exhaustion error
    pub fn rate_limit_exhausted(attempts: u32) -> Self {
        Self::RateLimitExhausted { attempts }
    }

    /// Create a response format error
    pub fn response_format(message: impl Into<String>) -> Self {
        Self::ResponseFormat {
            message: message.into(),
        }
    }

    /// Create a sheet writing error
    pub fn sheet_writing(
        message: impl Into<String>,
        source: Option<polars::error::PolarsError>,
    ) -> Self {
        Self::SheetWriting {
            message: message.into(),
            source,
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::ApiRequest {
            message: "API request failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<polars::error::PolarsError> for Error {
    fn from(error: polars::error::PolarsError) -> Self {
        Self::SheetWriting {
            message: "DataFrame operation failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}
