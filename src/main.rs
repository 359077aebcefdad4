mod adapters;
mod application;
mod cli;
mod config;
mod logging;
mod ports;
mod reconciliation;
mod shared;

use std::io::Read;
use std::path::Path;
use std::process;

use serde_json::Value;
use tracing::info;

use adapters::outbound::network::{AggregatorHttpClient, RetryPolicy, ScannerHttpClient};
use application::dto::{ReconcileOutcome, ReconcileRequest};
use application::use_cases::ReconcileFindingsUseCase;
use cli::Args;
use config::{discover_config, load_config_from_path, Settings};
use shared::error::{ExitCode, ReconcileError};
use shared::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        // Display error chain
        for cause in e.chain().skip(1) {
            eprintln!("\nCaused by: {}", cause);
        }

        eprintln!();
        process::exit(ExitCode::ApplicationError.as_i32());
    }
}

#[tokio::main]
async fn run() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Load configuration: explicit path, else auto-discovery, else defaults
    let file_config = match args.config.as_deref() {
        Some(path) => load_config_from_path(Path::new(path))?,
        None => discover_config(Path::new("."))?.unwrap_or_default(),
    };
    let settings = Settings::resolve(args.overrides(), file_config)?;

    logging::init_logging(&settings.log_level, settings.log_format)?;

    let event = read_event(&args.event)?;

    // Create adapters (Dependency Injection)
    let retry = RetryPolicy::new(settings.max_retries);
    let scanner =
        ScannerHttpClient::new(&settings.scanner_url, settings.auth_token.as_deref(), retry)?;
    let aggregator = AggregatorHttpClient::new(
        &settings.aggregator_url,
        settings.auth_token.as_deref(),
        retry,
    )?;

    // Create use case with injected dependencies
    let use_case = ReconcileFindingsUseCase::new(scanner, aggregator);

    // Execute use case
    let report = use_case
        .execute(ReconcileRequest::new(event, settings.dry_run))
        .await?;

    match report.outcome {
        ReconcileOutcome::Completed => info!(
            references = report.references,
            written = report.written,
            skipped = report.skipped,
            failed = report.failed,
            "reconciliation finished"
        ),
        ReconcileOutcome::NoFindings => info!("reconciliation finished: nothing to do"),
        // A dropped batch still exits zero: the scheduler's redelivery is
        // the recovery path, and a non-zero exit would double-count it.
        ReconcileOutcome::SourceError => info!(
            references = report.references,
            "reconciliation aborted on scanning-service errors; awaiting redelivery"
        ),
    }

    Ok(())
}

fn read_event(source: &str) -> Result<Value> {
    let raw = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| ReconcileError::EventReadError {
                source_name: "stdin".to_string(),
                details: e.to_string(),
            })?;
        buffer
    } else {
        std::fs::read_to_string(source).map_err(|e| ReconcileError::EventReadError {
            source_name: source.to_string(),
            details: e.to_string(),
        })?
    };

    let event = serde_json::from_str(&raw).map_err(|e| ReconcileError::MalformedEvent {
        details: e.to_string(),
    })?;
    Ok(event)
}
