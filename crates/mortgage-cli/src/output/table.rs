use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_value, schedule_rows, SCHEDULE_COLUMNS};

/// Render an analysis envelope as tables: summary fields, then the
/// schedule if one was requested, then warnings and methodology.
pub fn render_table(value: &Value) -> String {
    let mut out = String::new();

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                out.push_str(&summary_table(result));
                out.push('\n');
                if let Some(rows) = schedule_rows(value) {
                    out.push('\n');
                    out.push_str(&schedule_table(rows));
                    out.push('\n');
                }
                out.push_str(&envelope_notes(map));
            }
            _ => {
                out.push_str(&summary_table(map));
                out.push('\n');
            }
        },
        _ => {
            out.push_str(&format_value(value));
            out.push('\n');
        }
    }

    out
}

/// Month / payment / principal / interest / balance table.
pub fn schedule_table(rows: &[Value]) -> String {
    if rows.is_empty() {
        return "(empty schedule)".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Month", "Payment", "Principal", "Interest", "Balance"]);
    for row in rows {
        builder.push_record(
            SCHEDULE_COLUMNS
                .iter()
                .map(|col| row.get(*col).map(format_value).unwrap_or_default()),
        );
    }
    Table::from(builder).to_string()
}

fn summary_table(map: &Map<String, Value>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map.iter().filter(|(key, _)| key.as_str() != "schedule") {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    Table::from(builder).to_string()
}

fn envelope_notes(envelope: &Map<String, Value>) -> String {
    let mut notes = String::new();

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            notes.push_str("\nWarnings:\n");
            for w in warnings.iter().filter_map(Value::as_str) {
                notes.push_str(&format!("  - {}\n", w));
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        notes.push_str(&format!("\nMethodology: {}\n", meth));
    }

    notes
}
