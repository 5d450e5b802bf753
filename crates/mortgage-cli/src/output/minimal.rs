use serde_json::Value;

use super::format_value;

/// Key answer fields, in order of priority.
const PRIORITY_KEYS: [&str; 3] = ["monthly_payment", "total_payment", "overpayment"];

/// Just the key answer value from the output: the monthly payment, or
/// the first field of the result when that is missing.
pub fn render_minimal(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key).filter(|v| !v.is_null()) {
                return format_value(val);
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_value(val));
        }
    }

    format_value(result_obj)
}
