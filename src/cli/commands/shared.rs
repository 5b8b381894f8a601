//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! the command implementations.

use crate::cli::args::{ParseArgs, ProcessArgs};
use crate::config::{Config, FieldSet};
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{debug, info};

/// Processing statistics for reporting across a batch run
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    /// Number of images discovered in the input directory
    pub images_discovered: usize,
    /// Number of images successfully processed end to end
    pub images_processed: usize,
    /// Number of images that failed and were skipped
    pub images_failed: usize,
    /// Number of records that passed validation
    pub records_valid: usize,
    /// Number of records exported with validation complaints
    pub records_invalid: usize,
    /// Total processing time
    pub processing_time: std::time::Duration,
    /// Path and size of the written export
    pub export: Option<ExportSummary>,
}

/// Summary of the written export file
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub size_bytes: u64,
}

impl ProcessingStats {
    /// Format output size in human-readable format
    pub fn format_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

/// Set up structured logging for the process command
pub fn setup_logging(args: &ProcessArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("medcard_processor={}", log_level)));

    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Set up structured logging for the parse command
pub fn setup_parse_logging(args: &ParseArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("medcard_processor={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using a layered approach (defaults -> env -> args)
pub fn load_configuration(args: &ProcessArgs) -> Result<Config> {
    info!("Loading configuration");

    let mut config = Config::from_env();
    apply_cli_overrides(&mut config, args);
    config.validate_for_processing()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &ProcessArgs) {
    if let Some(input_path) = &args.input_path {
        config.processing.image_dir = input_path.clone();
    }
    if let Some(output_path) = &args.output_path {
        config.export.output_dir = output_path.clone();
    }
    if let Some(output_file) = &args.output_file {
        config.export.output_file = Some(output_file.clone());
    }
    if let Some(model) = &args.model {
        config.api.model = model.clone();
    }
    if let Some(field_list) = &args.fields {
        config.fields = FieldSet::from_fields(&field_list.fields);
    }

    config.processing.inter_request_delay_ms = args.inter_request_delay_ms;
    config.api.max_retries = args.max_retries;
}

/// Check if an error is critical enough to stop processing
pub fn is_critical_error(error: &Error) -> bool {
    matches!(
        error,
        Error::Configuration { .. }
            | Error::RateLimitExhausted { .. }
            | Error::ProcessingInterrupted { .. }
    )
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} ETA: {eta}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::CardField;
    use clap::Parser;

    #[test]
    fn test_format_size() {
        assert_eq!(ProcessingStats::format_size(500), "500 B");
        assert_eq!(ProcessingStats::format_size(1536), "1.50 KB");
        assert_eq!(ProcessingStats::format_size(1048576), "1.00 MB");
    }

    #[test]
    fn test_is_critical_error() {
        let config_error = Error::configuration("Test config error".to_string());
        let rate_error = Error::rate_limit_exhausted(3);
        let io_error = Error::io(
            "Test IO error".to_string(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "test"),
        );

        assert!(is_critical_error(&config_error));
        assert!(is_critical_error(&rate_error));
        assert!(!is_critical_error(&io_error));
    }

    #[test]
    fn test_cli_overrides_replace_env_defaults() {
        let args = crate::cli::args::ProcessArgs::parse_from([
            "process",
            "--output-file",
            "custom.csv",
            "--fields",
            "age,sex",
            "--delay",
            "250",
        ]);

        let mut config = Config::default();
        apply_cli_overrides(&mut config, &args);

        assert_eq!(
            config.export.output_file,
            Some(std::path::PathBuf::from("custom.csv"))
        );
        assert_eq!(config.fields.fields(), &[CardField::Age, CardField::Sex]);
        assert_eq!(config.processing.inter_request_delay_ms, 250);
    }
}
