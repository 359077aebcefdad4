use serde_json::Value;
use tracing::{debug, error, info};

use crate::application::dto::{ReconcileReport, ReconcileRequest, ReferenceOutcome};
use crate::ports::outbound::{DetailRepository, FindingIdentifier, FindingStore};
use crate::reconciliation::domain::{DerivedFields, FindingRef};
use crate::shared::error::ReconcileError;
use crate::shared::Result;

/// ReconcileFindingsUseCase - Core use case for the reconciliation protocol
///
/// One execution processes one event batch start-to-finish: extract the
/// finding references, bulk-fetch their detail records, and for each one
/// run fetch → compare → conditional write against the aggregator. The
/// comparison is the loop-prevention guard: updating a finding's
/// user-defined fields re-emits an event, so a write only happens when
/// the stored fields actually differ.
///
/// All service I/O is sequential; transient failures are retried inside
/// the injected clients, never here.
///
/// # Type Parameters
/// * `D` - DetailRepository implementation (scanning service)
/// * `S` - FindingStore implementation (findings aggregator)
pub struct ReconcileFindingsUseCase<D, S> {
    detail_repository: D,
    finding_store: S,
}

impl<D, S> ReconcileFindingsUseCase<D, S>
where
    D: DetailRepository,
    S: FindingStore,
{
    /// Creates a new ReconcileFindingsUseCase with injected service clients
    pub fn new(detail_repository: D, finding_store: S) -> Self {
        Self {
            detail_repository,
            finding_store,
        }
    }

    /// Executes the reconciliation for one event batch.
    ///
    /// Returns normally for benign no-ops and for a batch dropped because
    /// of scanning-service errors; the report's outcome distinguishes the
    /// cases. An `Err` is reserved for fatal conditions: a malformed
    /// event, a misaligned bulk response, or client retry exhaustion.
    pub async fn execute(&self, request: ReconcileRequest) -> Result<ReconcileReport> {
        debug!(payload = %request.event, "received event payload");

        let references = FindingRef::extract_all(&request.event)?;
        if references.is_empty() {
            info!("no valid source finding references in event, nothing to reconcile");
            return Ok(ReconcileReport::no_findings());
        }
        info!(
            invocation = %request.invocation_id,
            references = references.len(),
            dry_run = request.dry_run,
            "reconciling findings batch"
        );

        let source_ids: Vec<String> = references
            .iter()
            .map(|reference| reference.source_id.clone())
            .collect();
        let batch = self.detail_repository.fetch_details(&source_ids).await?;

        if !batch.errors.is_empty() {
            for batch_error in &batch.errors {
                error!(error = %batch_error, "scanning service reported a batch error");
            }
            error!(
                errors = batch.errors.len(),
                "dropping batch without writes; recovery is the scheduler's redelivery"
            );
            return Ok(ReconcileReport::source_error(references.len()));
        }

        // The bulk response carries no ids to re-correlate by, so the
        // request-order alignment must hold exactly.
        if batch.details.len() != references.len() {
            return Err(ReconcileError::DetailCountMismatch {
                requested: references.len(),
                returned: batch.details.len(),
            }
            .into());
        }

        let mut outcomes = Vec::with_capacity(references.len());
        for (reference, detail) in references.iter().zip(batch.details.iter()) {
            outcomes.push(self.reconcile_one(reference, detail, request.dry_run).await?);
        }

        let report = ReconcileReport::completed(&outcomes);
        info!(
            written = report.written,
            skipped = report.skipped,
            failed = report.failed,
            "batch reconciled"
        );
        Ok(report)
    }

    /// Runs fetch → compare → conditional write for one reference.
    async fn reconcile_one(
        &self,
        reference: &FindingRef,
        detail: &Value,
        dry_run: bool,
    ) -> Result<ReferenceOutcome> {
        let derived = DerivedFields::from_detail(detail);
        let stored = self
            .finding_store
            .current_user_defined_fields(&reference.source_id)
            .await?;

        if derived.matches(stored.as_ref()) {
            info!(
                source_id = %reference.source_id,
                "stored user-defined fields already match, not updating"
            );
            return Ok(ReferenceOutcome::Skipped);
        }

        if dry_run {
            info!(
                source_id = %reference.source_id,
                fields = ?derived.as_map(),
                "dry-run: would replace user-defined fields"
            );
            return Ok(ReferenceOutcome::WouldWrite);
        }

        let identifier = FindingIdentifier {
            id: reference.source_id.clone(),
            product_arn: reference.product_arn.clone().unwrap_or_default(),
        };
        let receipt = self
            .finding_store
            .update_user_defined_fields(&identifier, derived.as_map())
            .await?;

        if receipt.accepted() {
            info!(
                source_id = %reference.source_id,
                aggregator_id = reference.aggregator_id.as_deref().unwrap_or("<unknown>"),
                "updated user-defined fields"
            );
            return Ok(ReferenceOutcome::Written);
        }

        for rejected in &receipt.unprocessed {
            error!(
                source_id = %reference.source_id,
                code = rejected.code.as_deref().unwrap_or("UNKNOWN"),
                message = rejected.message.as_deref().unwrap_or(""),
                "aggregator left the update unprocessed"
            );
        }
        if receipt.unprocessed.is_empty() {
            error!(
                source_id = %reference.source_id,
                "aggregator confirmed zero findings for the update"
            );
        }
        Ok(ReferenceOutcome::WriteFailed)
    }
}
