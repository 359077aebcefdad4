use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapters::outbound::network::backoff::{execute_with_backoff, RetryPolicy};
use crate::adapters::outbound::network::build_service_client;
use crate::ports::outbound::{FindingIdentifier, FindingStore, RejectedUpdate, UpdateReceipt};
use crate::shared::Result;

#[derive(Debug, Serialize)]
struct GetFindingsRequest {
    #[serde(rename = "Filters")]
    filters: Filters,
    #[serde(rename = "MaxResults")]
    max_results: u32,
}

#[derive(Debug, Serialize)]
struct Filters {
    #[serde(rename = "Id")]
    id: Vec<StringFilter>,
}

#[derive(Debug, Serialize)]
struct StringFilter {
    #[serde(rename = "Value")]
    value: String,
    #[serde(rename = "Comparison")]
    comparison: &'static str,
}

#[derive(Debug, Deserialize)]
struct GetFindingsResponse {
    #[serde(rename = "Findings", default)]
    findings: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct BatchUpdateRequest<'a> {
    #[serde(rename = "FindingIdentifiers")]
    finding_identifiers: Vec<WireFindingIdentifier>,
    #[serde(rename = "UserDefinedFields")]
    user_defined_fields: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFindingIdentifier {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "ProductArn")]
    product_arn: String,
}

#[derive(Debug, Deserialize)]
struct BatchUpdateResponse {
    #[serde(rename = "ProcessedFindings", default)]
    processed_findings: Vec<WireFindingIdentifier>,
    #[serde(rename = "UnprocessedFindings", default)]
    unprocessed_findings: Vec<WireUnprocessedFinding>,
}

#[derive(Debug, Deserialize)]
struct WireUnprocessedFinding {
    #[serde(rename = "FindingIdentifier", default)]
    finding_identifier: Option<WireFindingIdentifier>,
    #[serde(rename = "ErrorCode", default)]
    error_code: Option<String>,
    #[serde(rename = "ErrorMessage", default)]
    error_message: Option<String>,
}

/// AggregatorHttpClient adapter for the findings aggregator's REST API.
///
/// Implements the FindingStore port: a filtered read used by the
/// loop-prevention check, and the batched single-item update that
/// replaces a finding's user-defined fields.
pub struct AggregatorHttpClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl AggregatorHttpClient {
    const FINDINGS_PATH: &'static str = "/findings";
    const BATCH_UPDATE_PATH: &'static str = "/findings/batchupdate";
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

    fn user_defined_fields_of(finding: &Value) -> Option<BTreeMap<String, String>> {
        finding.get("UserDefinedFields")?.as_object().map(|map| {
            map.iter()
                .filter_map(|(key, value)| value.as_str().map(|v| (key.clone(), v.to_string())))
                .collect()
        })
    }
}

#[async_trait]
impl FindingStore for AggregatorHttpClient {
    async fn current_user_defined_fields(
        &self,
        finding_id: &str,
    ) -> Result<Option<BTreeMap<String, String>>> {
        let url = format!("{}{}", self.base_url, Self::FINDINGS_PATH);
        let request = GetFindingsRequest {
            filters: Filters {
                id: vec![StringFilter {
                    value: finding_id.to_string(),
                    comparison: "EQUALS",
                }],
            },
            max_results: 1,
        };

        let response: GetFindingsResponse =
            execute_with_backoff(&self.retry, "aggregator service", || {
                self.client.post(&url).json(&request)
            })
            .await?;

        Ok(response
            .findings
            .first()
            .and_then(Self::user_defined_fields_of))
    }

    async fn update_user_defined_fields(
        &self,
        identifier: &FindingIdentifier,
        fields: &BTreeMap<String, String>,
    ) -> Result<UpdateReceipt> {
        let url = format!("{}{}", self.base_url, Self::BATCH_UPDATE_PATH);
        let request = BatchUpdateRequest {
            finding_identifiers: vec![WireFindingIdentifier {
                id: identifier.id.clone(),
                product_arn: identifier.product_arn.clone(),
            }],
            user_defined_fields: fields,
        };

        let response: BatchUpdateResponse =
            execute_with_backoff(&self.retry, "aggregator service", || {
                self.client.patch(&url).json(&request)
            })
            .await?;

        Ok(UpdateReceipt {
            processed: response.processed_findings.len(),
            unprocessed: response
                .unprocessed_findings
                .into_iter()
                .map(|u| RejectedUpdate {
                    id: u.finding_identifier.map(|fi| fi.id),
                    code: u.error_code,
                    message: u.error_message,
                })
                .collect(),
        })
    }
}
