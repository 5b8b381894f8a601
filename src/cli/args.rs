//! Command-line argument definitions for the medical card processor
//!
//! This module defines the complete CLI interface using clap derive API.

use crate::app::models::CardField;
use crate::constants::{DEFAULT_INTER_REQUEST_DELAY_MS, DEFAULT_MAX_RETRIES};
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the medical card processor
///
/// Extracts structured patient data from photographed medical cards via a
/// remote vision-language model and exports validated records to a
/// spreadsheet-ready CSV file.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "medcard-processor",
    version,
    about = "Extract structured patient data from medical card images into a CSV export",
    long_about = "Processes a directory of photographed medical cards through a remote \
                  vision-language model, parses each reply into a structured patient record, \
                  validates fields against Ethiopian domain rules (calendar dates, kebele \
                  codes, telephone format), and exports the records as a spreadsheet-ready \
                  CSV file with one row per card image."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the medical card processor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process a directory of card images through the vision API (default command)
    Process(ProcessArgs),
    /// Parse a saved model reply without calling the API
    Parse(ParseArgs),
}

/// Arguments for the process command (main batch processing)
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Input directory of card images
    ///
    /// Scanned recursively for .jpg, .jpeg, and .png files. If not
    /// specified, defaults to ./images or the MEDCARD_IMAGE_DIR variable.
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        help = "Input directory of card images"
    )]
    pub input_path: Option<PathBuf>,

    /// Output directory for the generated CSV export
    ///
    /// Will be created if it doesn't exist. The export is named
    /// medical_cards_export_YYYY-MM-DD.csv unless --output-file is given.
    /// If not specified, defaults to ./output
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Output directory for the generated CSV export"
    )]
    pub output_path: Option<PathBuf>,

    /// Explicit output file path
    ///
    /// Overrides the date-stamped default filename.
    #[arg(
        long = "output-file",
        value_name = "FILE",
        help = "Explicit output file path, overriding the date-stamped default"
    )]
    pub output_file: Option<PathBuf>,

    /// Specific card fields to extract (comma-separated list)
    ///
    /// If not specified, extracts the full card. Available fields:
    /// patient_name, age, sex, telephone, address, kebele, date
    #[arg(
        short = 'f',
        long = "fields",
        value_name = "LIST",
        help = "Comma-separated list of card fields to extract",
        long_help = "Specific card fields to extract as a comma-separated list.\n\
                     Available fields:\n  \
                     patient_name, age, sex, telephone, address, kebele, date\n\n\
                     If not specified, extracts the full card"
    )]
    pub fields: Option<FieldList>,

    /// Model identifier to request from the provider
    ///
    /// If not specified, uses the MEDCARD_MODEL variable or the built-in
    /// default.
    #[arg(
        short = 'm',
        long = "model",
        value_name = "MODEL",
        help = "Vision model identifier to request"
    )]
    pub model: Option<String>,

    /// Delay between consecutive API requests in milliseconds
    ///
    /// Spaces out requests to stay under provider rate limits.
    #[arg(
        long = "delay",
        value_name = "MS",
        default_value_t = DEFAULT_INTER_REQUEST_DELAY_MS,
        help = "Delay between consecutive API requests in milliseconds"
    )]
    pub inter_request_delay_ms: u64,

    /// Maximum attempts per image when rate limited
    #[arg(
        long = "max-retries",
        value_name = "COUNT",
        default_value_t = DEFAULT_MAX_RETRIES,
        help = "Maximum attempts per image when rate limited"
    )]
    pub max_retries: u32,

    /// Perform a dry run without calling the API
    ///
    /// Shows which images would be processed and where the export would be
    /// written. No API key is required.
    #[arg(
        long = "dry-run",
        help = "Show what would be processed without calling the API"
    )]
    pub dry_run: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors and critical messages. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for machine-readable results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the parse command (offline reply parsing)
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// Reply text to parse
    ///
    /// If not specified, the text is read from --file or stdin.
    #[arg(value_name = "TEXT", help = "Reply text to parse")]
    pub text: Option<String>,

    /// File containing a saved model reply
    #[arg(
        short = 'F',
        long = "file",
        value_name = "FILE",
        help = "File containing a saved model reply",
        conflicts_with = "text"
    )]
    pub file: Option<PathBuf>,

    /// Specific card fields to extract (comma-separated list)
    #[arg(
        short = 'f',
        long = "fields",
        value_name = "LIST",
        help = "Comma-separated list of card fields to extract"
    )]
    pub fields: Option<FieldList>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Enable verbose logging (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

/// Wrapper for parsing comma-separated field lists
#[derive(Debug, Clone)]
pub struct FieldList {
    pub fields: Vec<CardField>,
}

impl FromStr for FieldList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let names: Vec<&str> = s
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        if names.is_empty() {
            return Err(Error::data_validation(
                "Field list cannot be empty".to_string(),
            ));
        }

        let mut fields = Vec::new();
        for name in names {
            let field = CardField::from_str(name)?;
            if !fields.contains(&field) {
                fields.push(field);
            }
        }

        Ok(FieldList { fields })
    }
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        // Validate input path exists (only if explicitly provided)
        if let Some(input_path) = &self.input_path {
            if !input_path.exists() {
                return Err(Error::configuration(format!(
                    "Input path does not exist: {}",
                    input_path.display()
                )));
            }

            if !input_path.is_dir() {
                return Err(Error::configuration(format!(
                    "Input path is not a directory: {}",
                    input_path.display()
                )));
            }
        }

        if self.max_retries == 0 {
            return Err(Error::configuration(
                "max-retries must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ParseArgs {
    /// Validate the parse command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(file) = &self.file {
            if !file.exists() {
                return Err(Error::configuration(format!(
                    "Reply file does not exist: {}",
                    file.display()
                )));
            }
        }
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_list_parses_names_and_aliases() {
        let list: FieldList = "age, sex, phone".parse().unwrap();
        assert_eq!(
            list.fields,
            vec![CardField::Age, CardField::Sex, CardField::Telephone]
        );
    }

    #[test]
    fn test_field_list_drops_duplicates() {
        let list: FieldList = "age,age,sex".parse().unwrap();
        assert_eq!(list.fields, vec![CardField::Age, CardField::Sex]);
    }

    #[test]
    fn test_field_list_rejects_unknown_names() {
        assert!("age,blood_type".parse::<FieldList>().is_err());
        assert!("".parse::<FieldList>().is_err());
    }

    #[test]
    fn test_log_level_from_verbosity() {
        let mut args = ProcessArgs::parse_from(["process"]);
        assert_eq!(args.get_log_level(), "warn");
        args.verbose = 2;
        assert_eq!(args.get_log_level(), "debug");
        args.quiet = true;
        args.verbose = 0;
        assert_eq!(args.get_log_level(), "error");
    }

    #[test]
    fn test_quiet_hides_progress() {
        let mut args = ProcessArgs::parse_from(["process"]);
        assert!(args.show_progress());
        args.quiet = true;
        assert!(!args.show_progress());
    }
}
