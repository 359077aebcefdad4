use std::collections::BTreeMap;

use serde_json::Value;

use crate::reconciliation::domain::json_path;

/// Field key for the CISA known-exploited-vulnerabilities catalog date.
pub const DATE_ADDED_KEY: &str = "cisaDateAdded";
/// Field key for the comma-joined technique identifiers.
pub const TTPS_KEY: &str = "ttps";

const DATE_ADDED_PATH: &str = "cisaData.dateAdded";
const TTPS_PATH: &str = "cisaData.ttps";

/// The flat field set derived from a scanning-service detail record.
///
/// This is both the unit of comparison against the aggregator's stored
/// user-defined fields and the unit of write. Both values default to the
/// empty string when the detail record does not carry them, so a detail
/// record without CISA data still produces a well-formed field set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFields {
    fields: BTreeMap<String, String>,
}

impl DerivedFields {
    /// Computes the derived field set from a raw detail record.
    pub fn from_detail(detail: &Value) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(
            DATE_ADDED_KEY.to_string(),
            json_path::lookup_str(detail, DATE_ADDED_PATH, ""),
        );
        fields.insert(TTPS_KEY.to_string(), join_ttps(detail));
        Self { fields }
    }

    /// Loop-prevention check: true when the aggregator already stores
    /// exactly these fields, in which case a write would be redundant and
    /// would only re-trigger the event source.
    pub fn matches(&self, stored: Option<&BTreeMap<String, String>>) -> bool {
        stored.is_some_and(|current| *current == self.fields)
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.fields
    }
}

fn join_ttps(detail: &Value) -> String {
    json_path::lookup(detail, TTPS_PATH)
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}
