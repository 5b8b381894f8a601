//! Fixed-column export schema
//!
//! Maps each record field plus the provenance filename to a fixed output
//! column and assembles the polars DataFrame the writer serializes.

use polars::prelude::*;

use crate::Result;
use crate::app::models::{CardField, CardRecord};
use crate::constants::EXPORT_COLUMNS;

/// Build the export DataFrame, one row per record, columns in fixed order.
///
/// Null fields become empty cells; a blank-but-present kebele is also an
/// empty cell, which is the acceptable-absent representation.
pub fn records_to_dataframe(records: &[CardRecord]) -> Result<DataFrame> {
    let column_for = |field: CardField| -> Vec<Option<String>> {
        records
            .iter()
            .map(|r| r.extraction.get(field).map(|v| v.to_string()))
            .collect()
    };

    let filenames: Vec<String> = records.iter().map(|r| r.image_filename.clone()).collect();

    let df = df!(
        EXPORT_COLUMNS[0] => column_for(CardField::PatientName),
        EXPORT_COLUMNS[1] => column_for(CardField::Age),
        EXPORT_COLUMNS[2] => column_for(CardField::Sex),
        EXPORT_COLUMNS[3] => column_for(CardField::Telephone),
        EXPORT_COLUMNS[4] => column_for(CardField::Address),
        EXPORT_COLUMNS[5] => column_for(CardField::Kebele),
        EXPORT_COLUMNS[6] => column_for(CardField::Date),
        EXPORT_COLUMNS[7] => filenames,
    )?;

    Ok(df)
}
