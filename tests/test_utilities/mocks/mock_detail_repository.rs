use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use findings_reconciler::prelude::*;
use serde_json::Value;

/// Mock DetailRepository for testing
///
/// Records every batch request so tests can assert how the use case
/// called the scanning service. Implemented for `&MockDetailRepository`
/// so the test keeps the mock for inspection after handing it to the
/// use case.
pub struct MockDetailRepository {
    batch: DetailBatch,
    calls: AtomicUsize,
    requests: Mutex<Vec<Vec<String>>>,
}

impl MockDetailRepository {
    pub fn new() -> Self {
        Self {
            batch: DetailBatch::default(),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.batch.details.push(detail);
        self
    }

    pub fn with_error(mut self, finding_id: &str, code: &str) -> Self {
        self.batch.errors.push(DetailError {
            finding_id: Some(finding_id.to_string()),
            code: Some(code.to_string()),
            message: None,
        });
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_ids(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockDetailRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DetailRepository for &MockDetailRepository {
    async fn fetch_details(&self, finding_ids: &[String]) -> Result<DetailBatch> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(finding_ids.to_vec());
        Ok(self.batch.clone())
    }
}
