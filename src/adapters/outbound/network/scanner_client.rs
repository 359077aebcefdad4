use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapters::outbound::network::backoff::{execute_with_backoff, RetryPolicy};
use crate::adapters::outbound::network::build_service_client;
use crate::ports::outbound::{DetailBatch, DetailError, DetailRepository};
use crate::shared::Result;

#[derive(Debug, Serialize)]
struct BatchGetDetailsRequest<'a> {
    #[serde(rename = "findingArns")]
    finding_arns: &'a [String],
}

#[derive(Debug, Deserialize)]
struct BatchGetDetailsResponse {
    #[serde(rename = "findingDetails", default)]
    finding_details: Vec<Value>,
    #[serde(default)]
    errors: Vec<WireDetailError>,
}

#[derive(Debug, Deserialize)]
struct WireDetailError {
    #[serde(rename = "findingArn", default)]
    finding_arn: Option<String>,
    #[serde(rename = "errorCode", default)]
    error_code: Option<String>,
    #[serde(rename = "errorMessage", default)]
    error_message: Option<String>,
}

/// ScannerHttpClient adapter for the scanning service's bulk detail API.
///
/// Implements the DetailRepository port over the service's REST surface:
/// one POST with all finding ids, answered by order-aligned detail
/// records plus an error list. Throttling is expected under load, so
/// requests run through the shared backoff policy.
pub struct ScannerHttpClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ScannerHttpClient {
    const DETAILS_PATH: &'static str = "/findings/details/batch/get";
    const TIMEOUT_SECONDS: u64 = 30;

    pub fn new(base_url: &str, auth_token: Option<&str>, retry: RetryPolicy) -> Result<Self> {
        let client =
            build_service_client(auth_token, Duration::from_secs(Self::TIMEOUT_SECONDS))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        })
    }
}

#[async_trait]
impl DetailRepository for ScannerHttpClient {
    async fn fetch_details(&self, finding_ids: &[String]) -> Result<DetailBatch> {
        let url = format!("{}{}", self.base_url, Self::DETAILS_PATH);
        let request = BatchGetDetailsRequest {
            finding_arns: finding_ids,
        };

        let response: BatchGetDetailsResponse =
            execute_with_backoff(&self.retry, "scanning service", || {
                self.client.post(&url).json(&request)
            })
            .await?;

        Ok(DetailBatch {
            details: response.finding_details,
            errors: response
                .errors
                .into_iter()
                .map(|e| DetailError {
                    finding_id: e.finding_arn,
                    code: e.error_code,
                    message: e.error_message,
                })
                .collect(),
        })
    }
}
