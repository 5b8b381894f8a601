use tempfile::TempDir;

use crate::app::models::{CardField, CardRecord, ExtractionRecord};
use crate::app::services::sheet_writer::{SheetWriter, records_to_dataframe};
use crate::config::ExportConfig;
use crate::constants::{EXPORT_BASENAME, EXPORT_COLUMNS};

fn sample_record() -> CardRecord {
    let mut extraction = ExtractionRecord::empty();
    extraction.set(CardField::PatientName, "Abebe Bekele".to_string());
    extraction.set(CardField::Age, "34".to_string());
    extraction.set(CardField::Sex, "M".to_string());
    extraction.set(CardField::Telephone, "0912345678".to_string());
    extraction.set(CardField::Address, "Bahir Dar".to_string());
    extraction.set(CardField::Kebele, "05".to_string());
    extraction.set(CardField::Date, "15/08/2015".to_string());
    CardRecord::new(extraction, "card_001.jpg".to_string())
}

#[test]
fn test_dataframe_has_fixed_columns_in_order() {
    let df = records_to_dataframe(&[sample_record()]).unwrap();

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, EXPORT_COLUMNS);
    assert_eq!(df.height(), 1);
}

#[test]
fn test_dataframe_null_fields_become_null_cells() {
    let mut extraction = ExtractionRecord::empty();
    extraction.set(CardField::Age, "42".to_string());
    let record = CardRecord::new(extraction, "card_002.jpg".to_string());

    let df = records_to_dataframe(&[record]).unwrap();

    let name_col = df.column("Patient Name").unwrap();
    assert_eq!(name_col.null_count(), 1);
    let age_col = df.column("Age").unwrap();
    assert_eq!(age_col.null_count(), 0);
}

#[test]
fn test_write_produces_csv_with_header_and_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.csv");

    let writer = SheetWriter::new(&path);
    let stats = writer.write(&[sample_record()]).unwrap();

    assert_eq!(stats.rows_written, 1);
    assert!(stats.file_size > 0);
    assert_eq!(stats.output_path, path);

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    let header = lines.next().unwrap();
    assert!(header.contains("Patient Name"));
    assert!(header.contains("Image Filename"));
    let row = lines.next().unwrap();
    assert!(row.contains("Abebe Bekele"));
    assert!(row.contains("card_001.jpg"));
}

#[test]
fn test_write_empty_batch_produces_header_only_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");

    let stats = SheetWriter::new(&path).write(&[]).unwrap();

    assert_eq!(stats.rows_written, 0);
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1);
}

#[test]
fn test_write_creates_missing_output_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("out").join("export.csv");

    SheetWriter::new(&path).write(&[sample_record()]).unwrap();

    assert!(path.exists());
}

#[test]
fn test_from_config_explicit_file_wins() {
    let dir = TempDir::new().unwrap();
    let explicit = dir.path().join("custom.csv");
    let config = ExportConfig {
        output_dir: dir.path().join("ignored"),
        output_file: Some(explicit.clone()),
    };

    let writer = SheetWriter::from_config(&config);
    assert_eq!(writer.output_path(), explicit.as_path());
}

#[test]
fn test_from_config_default_is_date_stamped_under_output_dir() {
    let dir = TempDir::new().unwrap();
    let config = ExportConfig {
        output_dir: dir.path().to_path_buf(),
        output_file: None,
    };

    let writer = SheetWriter::from_config(&config);
    let name = writer
        .output_path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();
    assert!(name.starts_with(EXPORT_BASENAME));
    assert!(name.ends_with(".csv"));
    assert!(writer.output_path().starts_with(dir.path()));
}
