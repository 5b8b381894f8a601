//! Process command implementation for the medical card processor CLI
//!
//! This module contains the complete batch workflow: configuration loading,
//! image discovery, per-image extraction and validation, and export plus
//! report generation.

use super::shared::{
    ExportSummary, ProcessingStats, apply_cli_overrides, create_progress_bar, is_critical_error,
    load_configuration, setup_logging,
};
use crate::app::services::diagnostics::TracingDiagnostics;
use crate::app::services::image_loader::{discover_images, load_image};
use crate::app::services::record_validator::RecordValidator;
use crate::app::services::response_parser::ResponseParser;
use crate::app::services::sheet_writer::SheetWriter;
use crate::app::services::vision_api::{OpenRouterClient, VisionClient};
use crate::cli::args::{OutputFormat, ProcessArgs};
use crate::config::Config;
use crate::{CardRecord, Result};
use indicatif::HumanDuration;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Process command runner for the medical card processor
///
/// This function orchestrates the entire batch workflow:
/// 1. Set up logging and configuration
/// 2. Discover card images in the input directory
/// 3. Extract, parse, and validate each image with progress reporting
/// 4. Export the records and generate summary statistics
pub async fn run_process(args: ProcessArgs) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    setup_logging(&args)?;

    info!("Starting medical card processor");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    if args.dry_run {
        // A dry run needs no API key, so skip processing validation
        let mut config = Config::from_env();
        apply_cli_overrides(&mut config, &args);
        return run_dry_run(&config).await;
    }

    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let client = OpenRouterClient::new(config.api.clone(), &config.fields)?;

    let (records, mut stats) = process_images(&client, &config, args.show_progress()).await?;

    let writer = SheetWriter::from_config(&config.export);
    let write_stats = writer.write(&records)?;
    stats.export = Some(ExportSummary {
        path: write_stats.output_path,
        rows: write_stats.rows_written,
        size_bytes: write_stats.file_size,
    });

    stats.processing_time = start_time.elapsed();

    generate_final_report(&args, &stats)?;

    Ok(stats)
}

/// Perform a dry run showing what would be processed
async fn run_dry_run(config: &Config) -> Result<ProcessingStats> {
    info!("Performing dry run - no API calls will be made");

    let image_paths = discover_images(&config.processing.image_dir)?;

    let stats = ProcessingStats {
        images_discovered: image_paths.len(),
        ..Default::default()
    };

    for path in &image_paths {
        info!("Would process image: {}", path.display());
    }

    let writer = SheetWriter::from_config(&config.export);
    info!("Would create: {}", writer.output_path().display());

    info!(
        "Dry run complete: {} images would be processed with fields {:?}",
        stats.images_discovered,
        config.fields.fields()
    );

    Ok(stats)
}

/// Run the extraction pipeline over every image in the configured input
/// directory.
///
/// Generic over the vision client so the pipeline can be exercised against
/// a mock without network access. A failed image is logged and skipped;
/// only critical errors (configuration, exhausted rate limit) abort the
/// batch.
pub async fn process_images<C: VisionClient>(
    client: &C,
    config: &Config,
    show_progress: bool,
) -> Result<(Vec<CardRecord>, ProcessingStats)> {
    let image_paths = discover_images(&config.processing.image_dir)?;
    info!(
        "Discovered {} card images in {}",
        image_paths.len(),
        config.processing.image_dir.display()
    );

    let mut stats = ProcessingStats {
        images_discovered: image_paths.len(),
        ..Default::default()
    };

    if image_paths.is_empty() {
        warn!(
            "No card images found in {}",
            config.processing.image_dir.display()
        );
        return Ok((Vec::new(), stats));
    }

    let parser = ResponseParser::new(config.fields.clone(), Arc::new(TracingDiagnostics));
    let validator = RecordValidator::with_defaults();

    let progress = show_progress.then(|| {
        create_progress_bar(image_paths.len() as u64, "Processing card images")
    });

    let mut records = Vec::with_capacity(image_paths.len());

    for (i, path) in image_paths.iter().enumerate() {
        info!(
            "Processing image {} of {}: {}",
            i + 1,
            image_paths.len(),
            path.display()
        );

        match process_single_image(client, &parser, path).await {
            Ok(record) => {
                let report = validator.validate(&record.extraction);
                if report.is_valid {
                    stats.records_valid += 1;
                } else {
                    stats.records_invalid += 1;
                }

                stats.images_processed += 1;
                records.push(record);
            }
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                stats.images_failed += 1;

                // Continue with other images unless the error is critical
                if is_critical_error(&e) {
                    if let Some(pb) = &progress {
                        pb.abandon();
                    }
                    return Err(e);
                }
            }
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }

        // Space out requests to stay under provider rate limits
        let is_last = i + 1 == image_paths.len();
        if !is_last && config.processing.inter_request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.processing.inter_request_delay_ms))
                .await;
        }
    }

    if let Some(pb) = &progress {
        pb.finish_with_message("Card images processed");
    }

    Ok((records, stats))
}

/// Process one image: encode, query the vision model, and parse the reply
async fn process_single_image<C: VisionClient>(
    client: &C,
    parser: &ResponseParser,
    path: &std::path::Path,
) -> Result<CardRecord> {
    let image = load_image(path)?;
    let reply = client.extract_card_text(&image).await?;
    debug!("Model reply for {}: '{}'", image.filename, reply);

    let extraction = parser.parse(&reply);
    Ok(CardRecord::new(extraction, image.filename.clone()))
}

/// Generate final report based on output format preference
fn generate_final_report(args: &ProcessArgs, stats: &ProcessingStats) -> Result<()> {
    info!("Generating final report");

    match args.output_format {
        OutputFormat::Human => generate_human_report(stats),
        OutputFormat::Json => generate_json_report(stats),
    }
}

/// Generate human-readable report
fn generate_human_report(stats: &ProcessingStats) -> Result<()> {
    let duration = HumanDuration(stats.processing_time);

    println!("\n🎉 Medical Card Processing Complete!");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📊 Processing Summary:");
    println!("   • Images discovered: {}", stats.images_discovered);
    println!("   • Images processed: {}", stats.images_processed);
    println!("   • Valid records: {}", stats.records_valid);
    println!("   • Records with complaints: {}", stats.records_invalid);
    println!("   • Processing time: {}", duration);

    if stats.images_failed > 0 {
        println!("⚠️  Images failed and skipped: {}", stats.images_failed);
    }

    if let Some(export) = &stats.export {
        println!("\n📁 Export:");
        println!(
            "   • {}: {} rows, {}",
            export.path.display(),
            export.rows,
            ProcessingStats::format_size(export.size_bytes)
        );
    }

    println!();
    Ok(())
}

/// Generate JSON report for machine consumption
fn generate_json_report(stats: &ProcessingStats) -> Result<()> {
    let json_stats = serde_json::json!({
        "images_discovered": stats.images_discovered,
        "images_processed": stats.images_processed,
        "images_failed": stats.images_failed,
        "records_valid": stats.records_valid,
        "records_invalid": stats.records_invalid,
        "processing_time_seconds": stats.processing_time.as_secs_f64(),
        "export": stats.export.as_ref().map(|e| serde_json::json!({
            "path": e.path.display().to_string(),
            "rows": e.rows,
            "size_bytes": e.size_bytes,
        })),
    });

    println!("{}", serde_json::to_string_pretty(&json_stats).unwrap());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::vision_api::MockVisionClient;
    use tempfile::TempDir;

    fn test_config(image_dir: std::path::PathBuf) -> Config {
        let mut config = Config::default();
        config.processing.image_dir = image_dir;
        config.processing.inter_request_delay_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_process_images_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(temp_dir.path().to_path_buf());
        let client = MockVisionClient::new("<age>34</age>");

        let (records, stats) = process_images(&client, &config, false).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(stats.images_discovered, 0);
        assert_eq!(stats.images_processed, 0);
    }

    #[tokio::test]
    async fn test_process_images_round_trips_mock_reply_into_record() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("card.jpg"), b"\xff\xd8\xff").unwrap();
        let config = test_config(temp_dir.path().to_path_buf());
        let client = MockVisionClient::new("<sex>M</sex>");

        let (records, stats) = process_images(&client, &config, false).await.unwrap();

        assert_eq!(stats.images_discovered, 1);
        assert_eq!(stats.images_processed, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].image_filename, "card.jpg");
        assert_eq!(records[0].extraction.sex.as_deref(), Some("M"));
    }

    #[tokio::test]
    async fn test_dry_run_counts_images_without_processing() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("card_a.jpg"), b"bytes").unwrap();
        std::fs::write(temp_dir.path().join("card_b.png"), b"bytes").unwrap();
        let config = test_config(temp_dir.path().to_path_buf());

        let stats = run_dry_run(&config).await.unwrap();

        assert_eq!(stats.images_discovered, 2);
        assert_eq!(stats.images_processed, 0);
        assert!(stats.export.is_none());
    }

    #[test]
    fn test_generate_human_report_does_not_panic() {
        let stats = ProcessingStats {
            images_discovered: 3,
            images_processed: 2,
            images_failed: 1,
            records_valid: 1,
            records_invalid: 1,
            processing_time: std::time::Duration::from_secs(5),
            export: Some(ExportSummary {
                path: std::path::PathBuf::from("out.csv"),
                rows: 2,
                size_bytes: 1024,
            }),
        };

        assert!(generate_human_report(&stats).is_ok());
        assert!(generate_json_report(&stats).is_ok());
    }
}
