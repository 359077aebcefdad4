use serde_json::Value;

use crate::reconciliation::domain::json_path;
use crate::shared::error::ReconcileError;
use crate::shared::Result;

/// Path into the event payload where the findings batch lives.
const FINDINGS_PATH: &str = "detail.findings";

/// Nested product field carrying the aggregator's own finding id.
const AGGREGATOR_ID_PATH: &str = "ProductFields.aws/securityhub/FindingId";

/// One entry of the incoming event batch, reduced to the identifiers the
/// reconciliation protocol needs. Derived once per invocation, immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingRef {
    /// Scanning-service finding id. Also reused downstream as the
    /// aggregator's cross-reference key and write identifier.
    pub source_id: String,
    /// The aggregator's own finding id, when the event carries it.
    /// Carried for log correlation only.
    pub aggregator_id: Option<String>,
    /// ARN of the aggregator-side product that owns the finding.
    pub product_arn: Option<String>,
}

impl FindingRef {
    /// Extracts the ordered reference list from a raw event payload.
    ///
    /// An empty or absent findings list yields an empty vector, which the
    /// caller treats as a benign no-op. A findings entry without the
    /// mandatory "Id" field is a hard error for the whole invocation.
    pub fn extract_all(event: &Value) -> Result<Vec<FindingRef>> {
        let findings = match json_path::lookup(event, FINDINGS_PATH).and_then(Value::as_array) {
            Some(list) => list,
            None => return Ok(Vec::new()),
        };

        findings
            .iter()
            .enumerate()
            .map(|(index, finding)| Self::from_entry(index, finding))
            .collect()
    }

    fn from_entry(index: usize, finding: &Value) -> Result<FindingRef> {
        let source_id = finding
            .get("Id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or(ReconcileError::MissingSourceId { index })?
            .to_string();

        Ok(FindingRef {
            source_id,
            aggregator_id: json_path::lookup(finding, AGGREGATOR_ID_PATH)
                .and_then(Value::as_str)
                .map(str::to_string),
            product_arn: finding
                .get("ProductArn")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}
