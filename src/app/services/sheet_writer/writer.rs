//! CSV export writer
//!
//! Serializes validated records to a fixed-column CSV file. The output
//! directory is created on demand and the default filename carries a date
//! stamp so repeated runs never clobber an export being read elsewhere.

use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::schema::records_to_dataframe;
use crate::app::models::CardRecord;
use crate::config::ExportConfig;
use crate::constants::EXPORT_BASENAME;
use crate::{Error, Result};

/// Statistics for one export
#[derive(Debug, Clone, Default)]
pub struct WriteStats {
    /// Rows written to the sheet
    pub rows_written: usize,

    /// Size of the written file in bytes
    pub file_size: u64,

    /// Path of the written file
    pub output_path: PathBuf,
}

/// Writer for the fixed-column CSV export
pub struct SheetWriter {
    output_path: PathBuf,
}

impl SheetWriter {
    /// Create a writer from the export configuration, resolving the output
    /// path: an explicit file wins, otherwise a date-stamped default under
    /// the output directory
    pub fn from_config(config: &ExportConfig) -> Self {
        let output_path = match &config.output_file {
            Some(path) => path.clone(),
            None => {
                let stamp = chrono::Local::now().format("%Y-%m-%d");
                config
                    .output_dir
                    .join(format!("{}_{}.csv", EXPORT_BASENAME, stamp))
            }
        };
        Self { output_path }
    }

    /// Create a writer targeting an explicit path
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Write all records as one CSV file, returning write statistics.
    ///
    /// An empty batch still produces a header-only file so downstream
    /// consumers can rely on the export existing.
    pub fn write(&self, records: &[CardRecord]) -> Result<WriteStats> {
        if records.is_empty() {
            warn!("No records to export; writing header-only sheet");
        }

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::io(
                        format!("Failed to create output directory {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let mut df = records_to_dataframe(records)?;

        let mut file = File::create(&self.output_path).map_err(|e| {
            Error::io(
                format!("Failed to create {}", self.output_path.display()),
                e,
            )
        })?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .map_err(|e| {
                Error::sheet_writing(
                    format!("Failed to write {}", self.output_path.display()),
                    Some(e),
                )
            })?;

        let file_size = std::fs::metadata(&self.output_path)
            .map(|m| m.len())
            .unwrap_or(0);

        info!(
            "Saved {} records to {} ({} bytes)",
            records.len(),
            self.output_path.display(),
            file_size
        );

        Ok(WriteStats {
            rows_written: records.len(),
            file_size,
            output_path: self.output_path.clone(),
        })
    }
}
