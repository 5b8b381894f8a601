//! Command implementations for the medical card processor CLI
//!
//! This module contains the main command execution logic, progress
//! reporting, and error handling for the CLI interface. Each command is
//! implemented in its own module:
//! - `process`: batch extraction over an image directory with CSV export
//! - `parse`: offline parsing of a saved model reply

pub mod parse;
pub mod process;
pub mod shared;

// Re-export the main types and functions for backward compatibility
pub use shared::ProcessingStats;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner for the medical card processor
///
/// Dispatches to the appropriate subcommand handler based on CLI args.
pub async fn run(args: Args) -> Result<ProcessingStats> {
    match args.get_command() {
        Commands::Process(process_args) => process::run_process(process_args).await,
        Commands::Parse(parse_args) => parse::run_parse(parse_args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_stats_re_export() {
        let stats = ProcessingStats::default();
        assert_eq!(stats.images_processed, 0);
        assert!(stats.export.is_none());
    }
}
