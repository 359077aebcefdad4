use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::shared::Result;

/// Identifies one finding for a batched update in the aggregator.
///
/// `id` is the scanning-service finding id: the aggregator reuses it as
/// its own finding id for scanner-originated findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingIdentifier {
    pub id: String,
    pub product_arn: String,
}

/// Outcome of a batched update as reported by the aggregator.
#[derive(Debug, Clone, Default)]
pub struct UpdateReceipt {
    /// Number of findings the aggregator confirmed as updated.
    pub processed: usize,
    /// Findings the aggregator refused or failed to update.
    pub unprocessed: Vec<RejectedUpdate>,
}

impl UpdateReceipt {
    /// An update only counts as accepted when nothing was left
    /// unprocessed and at least one finding was confirmed.
    pub fn accepted(&self) -> bool {
        self.unprocessed.is_empty() && self.processed > 0
    }
}

/// One finding the aggregator left unprocessed, with its reason.
#[derive(Debug, Clone)]
pub struct RejectedUpdate {
    pub id: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// FindingStore port for the downstream findings aggregator.
///
/// The read side serves the loop-prevention check; the write side is
/// the single-item batched update the reconciler issues when the
/// derived field set differs from what is stored.
#[async_trait]
pub trait FindingStore: Send + Sync {
    /// Fetches the user-defined fields of the first finding matching the
    /// given cross-reference id. `None` when no finding matches or the
    /// matching finding has no user-defined fields yet.
    async fn current_user_defined_fields(
        &self,
        finding_id: &str,
    ) -> Result<Option<BTreeMap<String, String>>>;

    /// Replaces the user-defined fields of one finding.
    async fn update_user_defined_fields(
        &self,
        identifier: &FindingIdentifier,
        fields: &BTreeMap<String, String>,
    ) -> Result<UpdateReceipt>;
}
