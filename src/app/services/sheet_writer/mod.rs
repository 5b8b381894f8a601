//! Spreadsheet export service
//!
//! Converts batches of [`CardRecord`]s into a fixed-column CSV sheet using
//! Polars. Column order matches the layout clerks expect when opening the
//! export in a spreadsheet application.
//!
//! [`CardRecord`]: crate::app::models::CardRecord

pub mod schema;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use schema::records_to_dataframe;
pub use writer::{SheetWriter, WriteStats};
