use serde_json::Value;

/// Looks up a nested value by a dot-separated path.
///
/// Traverses successive object keys; a missing key, a non-object
/// intermediate value, or an empty terminal value (JSON null, `""`,
/// `[]`, `{}`) all count as a miss. Missing is a normal, expected case
/// given heterogeneous event shapes, so this never panics.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use findings_reconciler::reconciliation::domain::json_path::lookup;
///
/// let data = json!({"one": {"two": {"three": 1}}});
/// assert_eq!(lookup(&data, "one.two.three"), Some(&json!(1)));
/// assert_eq!(lookup(&data, "one.two.four"), None);
/// ```
pub fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = data;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    if is_empty(current) {
        None
    } else {
        Some(current)
    }
}

/// String-typed lookup with a caller-supplied default.
///
/// A hit that is not a JSON string is treated as a miss.
pub fn lookup_str(data: &Value, path: &str, default: &str) -> String {
    lookup(data, path)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(m) => m.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
