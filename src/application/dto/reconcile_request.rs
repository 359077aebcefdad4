use serde_json::Value;
use uuid::Uuid;

/// ReconcileRequest - Internal request DTO for the reconciliation use case
#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    /// Raw event payload as delivered by the invoking scheduler.
    pub event: Value,
    /// When set, comparisons run but no write is issued.
    pub dry_run: bool,
    /// Correlates the log lines of one invocation.
    pub invocation_id: Uuid,
}

impl ReconcileRequest {
    pub fn new(event: Value, dry_run: bool) -> Self {
        Self {
            event,
            dry_run,
            invocation_id: Uuid::new_v4(),
        }
    }
}
