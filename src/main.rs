// src/main.rs
mod builder;
mod dom;
mod extract;
mod handlers;
mod schema;
mod source;
mod storage;
mod utils;
mod walker;

use builder::BuildMode;
use clap::Parser;
use schema::ConversionStatus;
use source::load_documents;
use std::path::PathBuf;
use storage::{FailureRecord, RunReport, StorageManager};
use utils::AppError;

/// Command Line Interface for the landing page migrator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source of legacy documents: a JSON dump of {id, namespace, detail}
    /// rows, or a directory of <id>.html files
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for converted documents
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Restrict the run to these document ids, processed in the given order
    #[arg(long = "id")]
    ids: Vec<u64>,

    /// Skip these document ids
    #[arg(long = "ignore-id")]
    ignore_ids: Vec<u64>,

    /// Duplicate-singleton policy (strict fails the document, lenient
    /// records a warning and keeps the first block)
    #[arg(long, value_enum, default_value = "strict")]
    mode: BuildMode,

    /// Debug mode - save the raw HTML next to each converted document
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Initialize storage
    let storage = StorageManager::new(&args.output_dir);

    // 4. Load the legacy documents
    let rows = load_documents(&args.input, &args.ids, &args.ignore_ids)?;
    tracing::info!("Loaded {} documents from {}", rows.len(), args.input.display());

    if rows.is_empty() {
        return Err(AppError::Config(format!(
            "No documents found at {} after applying id filters",
            args.input.display()
        )));
    }

    // 5. Convert each document; one failure never aborts the batch
    let mut report = RunReport::new();
    report.total = rows.len();

    for row in &rows {
        tracing::info!("Converting document {} ({})", row.id, row.namespace);

        if args.debug {
            let debug_dir = format!("{}/{}/debug", args.output_dir, row.namespace);
            std::fs::create_dir_all(&debug_dir)?;
            let raw_path = format!("{}/{}_raw.html", debug_dir, row.id);
            std::fs::write(&raw_path, &row.detail)?;
            tracing::debug!("Saved raw document to: {}", raw_path);
        }

        match walker::convert_document(&row.detail, args.mode) {
            Ok(converted) => {
                match converted.status {
                    ConversionStatus::Success => report.succeeded += 1,
                    ConversionStatus::Warning => {
                        tracing::warn!(
                            "Document {} converted with {} issue(s)",
                            row.id,
                            converted.issues.len()
                        );
                        report.warnings += 1;
                    }
                }
                match storage.save_document(&row.namespace, row.id, &converted) {
                    Ok(path) => tracing::info!("Saved converted document to: {}", path.display()),
                    Err(e) => tracing::error!("Failed to save converted document: {}", e),
                }
            }
            Err(e) => {
                tracing::error!("Failed to convert document {}: {}", row.id, e);
                report.failed += 1;
                report.failures.push(FailureRecord {
                    id: row.id,
                    namespace: row.namespace.clone(),
                    code: e.code.to_string(),
                    message: e.message.clone(),
                });
                if let Err(e) = storage.save_failure(&row.namespace, row.id, &e) {
                    tracing::error!("Failed to save failure record: {}", e);
                }
            }
        }
    }

    // 6. Save the run report
    storage.save_report(&report)?;
    tracing::info!(
        "Processing finished. Success: {}, Warnings: {}, Failures: {}",
        report.succeeded,
        report.warnings,
        report.failed
    );

    if report.succeeded + report.warnings == 0 {
        return Err(AppError::Processing(format!(
            "Failed to convert any of the {} documents",
            report.total
        )));
    }

    Ok(())
}
