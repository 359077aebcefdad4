//! findings-reconciler - Event-driven findings reconciliation
//!
//! This library reconciles CISA KEV enrichment data from a source-of-truth
//! vulnerability scanning service into a downstream findings aggregator,
//! following hexagonal architecture principles. One invocation processes one
//! event batch: extract finding references, bulk-fetch their detail records,
//! and for each one run fetch → compare → conditional write. The comparison
//! against the aggregator's stored fields is the loop-prevention guard that
//! keeps the reconciler's own writes from re-triggering it.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`reconciliation`): Pure traversal and comparison logic
//! - **Application Layer** (`application`): The reconciliation use case and DTOs
//! - **Ports** (`ports`): Interface definitions for the two external services
//! - **Adapters** (`adapters`): reqwest-backed service clients
//! - **Shared** (`shared`): Common error types and the Result alias
//!
//! # Example
//!
//! ```no_run
//! use findings_reconciler::prelude::*;
//! use serde_json::json;
//!
//! # async fn run() -> findings_reconciler::shared::Result<()> {
//! // Create adapters
//! let retry = RetryPolicy::default();
//! let scanner = ScannerHttpClient::new("https://scanner.internal.example", None, retry)?;
//! let aggregator = AggregatorHttpClient::new("https://aggregator.internal.example", None, retry)?;
//!
//! // Create use case
//! let use_case = ReconcileFindingsUseCase::new(scanner, aggregator);
//!
//! // Execute
//! let event = json!({"detail": {"findings": [{"Id": "arn:scanner:finding/f1"}]}});
//! let report = use_case.execute(ReconcileRequest::new(event, false)).await?;
//! println!("written {}, skipped {}", report.written, report.skipped);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod logging;
pub mod ports;
pub mod reconciliation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::network::{
        AggregatorHttpClient, RetryPolicy, ScannerHttpClient,
    };
    pub use crate::application::dto::{
        ReconcileOutcome, ReconcileReport, ReconcileRequest, ReferenceOutcome,
    };
    pub use crate::application::use_cases::ReconcileFindingsUseCase;
    pub use crate::ports::outbound::{
        DetailBatch, DetailError, DetailRepository, FindingIdentifier, FindingStore,
        RejectedUpdate, UpdateReceipt,
    };
    pub use crate::reconciliation::domain::{DerivedFields, FindingRef};
    pub use crate::shared::Result;
}
