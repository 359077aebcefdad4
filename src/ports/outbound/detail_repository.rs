use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::shared::Result;

/// Result of a bulk detail fetch.
///
/// The scanning service contract is all-or-nothing from the caller's
/// perspective: any entry in `errors` makes the whole batch
/// untrustworthy, and `details` is order-aligned with the requested ids
/// only when `errors` is empty.
#[derive(Debug, Clone, Default)]
pub struct DetailBatch {
    /// Detail records, one per requested id, in request order.
    pub details: Vec<Value>,
    /// Per-item errors reported by the service.
    pub errors: Vec<DetailError>,
}

/// A per-item error entry from the scanning service's bulk response.
#[derive(Debug, Clone)]
pub struct DetailError {
    pub finding_id: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}

impl fmt::Display for DetailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} for {}: {}",
            self.code.as_deref().unwrap_or("UNKNOWN"),
            self.finding_id.as_deref().unwrap_or("<unspecified finding>"),
            self.message.as_deref().unwrap_or("no message"),
        )
    }
}

/// DetailRepository port for the source-of-truth scanning service.
///
/// Transient transport failures are the implementation's problem
/// (bounded retry with backoff); an `Err` from this port means retries
/// are exhausted and the invocation must fail.
#[async_trait]
pub trait DetailRepository: Send + Sync {
    /// Fetches detail records for all given finding ids in one batched call.
    async fn fetch_details(&self, finding_ids: &[String]) -> Result<DetailBatch>;
}
