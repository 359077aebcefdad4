use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use findings_reconciler::prelude::*;

/// Mock FindingStore for testing
///
/// Serves stored user-defined fields per finding id and records every
/// update the use case issues, optionally rejecting configured ids the
/// way the aggregator reports unprocessed findings.
pub struct MockFindingStore {
    stored: BTreeMap<String, BTreeMap<String, String>>,
    reject_ids: Vec<String>,
    reads: AtomicUsize,
    updates: Mutex<Vec<(FindingIdentifier, BTreeMap<String, String>)>>,
}

impl MockFindingStore {
    pub fn new() -> Self {
        Self {
            stored: BTreeMap::new(),
            reject_ids: Vec::new(),
            reads: AtomicUsize::new(0),
            updates: Mutex::new(Vec::new()),
        }
    }

    pub fn with_stored(mut self, finding_id: &str, fields: &[(&str, &str)]) -> Self {
        self.stored.insert(
            finding_id.to_string(),
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn rejecting(mut self, finding_id: &str) -> Self {
        self.reject_ids.push(finding_id.to_string());
        self
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> Vec<(FindingIdentifier, BTreeMap<String, String>)> {
        self.updates.lock().unwrap().clone()
    }
}

impl Default for MockFindingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FindingStore for &MockFindingStore {
    async fn current_user_defined_fields(
        &self,
        finding_id: &str,
    ) -> Result<Option<BTreeMap<String, String>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.stored.get(finding_id).cloned())
    }

    async fn update_user_defined_fields(
        &self,
        identifier: &FindingIdentifier,
        fields: &BTreeMap<String, String>,
    ) -> Result<UpdateReceipt> {
        self.updates
            .lock()
            .unwrap()
            .push((identifier.clone(), fields.clone()));

        if self.reject_ids.contains(&identifier.id) {
            Ok(UpdateReceipt {
                processed: 0,
                unprocessed: vec![RejectedUpdate {
                    id: Some(identifier.id.clone()),
                    code: Some("FindingNotFound".to_string()),
                    message: Some("no finding matches the identifier".to_string()),
                }],
            })
        } else {
            Ok(UpdateReceipt {
                processed: 1,
                unprocessed: vec![],
            })
        }
    }
}
