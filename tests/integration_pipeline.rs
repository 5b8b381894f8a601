//! Integration tests for the full extraction pipeline
//!
//! These tests drive the batch pipeline end to end with a mock vision
//! client: images on disk in a temporary directory, scripted model replies,
//! and a real CSV export that is read back and checked.

use medcard_processor::app::services::sheet_writer::SheetWriter;
use medcard_processor::app::services::vision_api::MockVisionClient;
use medcard_processor::cli::commands::process::process_images;
use medcard_processor::config::Config;
use std::path::Path;
use tempfile::TempDir;

fn write_fake_image(dir: &Path, name: &str) {
    // Content is opaque to the pipeline; only the bytes get encoded
    std::fs::write(dir.join(name), b"\xff\xd8\xfe\x00fake-jpeg-bytes").unwrap();
}

fn pipeline_config(image_dir: &Path) -> Config {
    let mut config = Config::default();
    config.processing.image_dir = image_dir.to_path_buf();
    config.processing.inter_request_delay_ms = 0;
    config
}

#[tokio::test]
async fn test_batch_pipeline_exports_one_row_per_image() {
    let temp_dir = TempDir::new().unwrap();
    let image_dir = temp_dir.path().join("images");
    std::fs::create_dir_all(&image_dir).unwrap();
    write_fake_image(&image_dir, "card_a.jpg");
    write_fake_image(&image_dir, "card_b.png");

    let config = pipeline_config(&image_dir);

    // Replies are consumed in discovery order (sorted by filename)
    let client = MockVisionClient::with_replies(vec![
        "<patient_name>Abebe Bekele</patient_name><age>34</age><sex>M</sex>\
         <telephone>0912345678</telephone><kebele>05</kebele><date>15/08/2015</date>"
            .to_string(),
        "42".to_string(),
    ]);

    let (records, stats) = process_images(&client, &config, false).await.unwrap();

    assert_eq!(stats.images_discovered, 2);
    assert_eq!(stats.images_processed, 2);
    assert_eq!(stats.images_failed, 0);
    assert_eq!(stats.records_valid, 1);
    assert_eq!(stats.records_invalid, 1);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].image_filename, "card_a.jpg");
    assert_eq!(records[0].extraction.patient_name.as_deref(), Some("Abebe Bekele"));
    assert_eq!(records[1].image_filename, "card_b.png");
    // the bare-number reply recovers only the age
    assert_eq!(records[1].extraction.age.as_deref(), Some("42"));
    assert!(records[1].extraction.patient_name.is_none());

    // Export and read the sheet back
    let export_path = temp_dir.path().join("output").join("export.csv");
    let write_stats = SheetWriter::new(&export_path).write(&records).unwrap();
    assert_eq!(write_stats.rows_written, 2);

    let content = std::fs::read_to_string(&export_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Patient Name,Age,Sex,Telephone,Address,Kebele,Date"));
    assert!(lines[1].contains("Abebe Bekele"));
    assert!(lines[1].contains("card_a.jpg"));
    assert!(lines[2].contains("42"));
    assert!(lines[2].contains("card_b.png"));
}

#[tokio::test]
async fn test_pipeline_restricted_field_set_ignores_other_tags() {
    let temp_dir = TempDir::new().unwrap();
    let image_dir = temp_dir.path().join("images");
    std::fs::create_dir_all(&image_dir).unwrap();
    write_fake_image(&image_dir, "card.jpg");

    let mut config = pipeline_config(&image_dir);
    config.fields = medcard_processor::config::FieldSet::from_fields(&[
        medcard_processor::CardField::Age,
    ]);

    let client =
        MockVisionClient::new("<age>7</age><sex>F</sex><telephone>0912345678</telephone>");

    let (records, _stats) = process_images(&client, &config, false).await.unwrap();

    assert_eq!(records[0].extraction.age.as_deref(), Some("7"));
    assert!(records[0].extraction.sex.is_none());
    assert!(records[0].extraction.telephone.is_none());
}

#[tokio::test]
async fn test_pipeline_nonexistent_image_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = pipeline_config(&temp_dir.path().join("missing"));
    let client = MockVisionClient::new("<age>34</age>");

    let result = process_images(&client, &config, false).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_pipeline_skips_non_image_files() {
    let temp_dir = TempDir::new().unwrap();
    let image_dir = temp_dir.path().join("images");
    std::fs::create_dir_all(&image_dir).unwrap();
    write_fake_image(&image_dir, "card.jpg");
    std::fs::write(image_dir.join("notes.txt"), "not an image").unwrap();
    std::fs::write(image_dir.join("export.csv"), "a,b").unwrap();

    let config = pipeline_config(&image_dir);
    let client = MockVisionClient::new("<age>34</age>");

    let (records, stats) = process_images(&client, &config, false).await.unwrap();

    assert_eq!(stats.images_discovered, 1);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].image_filename, "card.jpg");
}
