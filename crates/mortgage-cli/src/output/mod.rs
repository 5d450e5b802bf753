pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Column order of schedule rows; JSON objects come back key-sorted.
pub const SCHEDULE_COLUMNS: [&str; 5] = ["month", "payment", "principal", "interest", "balance"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => print!("{}", table::render_table(value)),
        OutputFormat::Csv => print!("{}", csv_out::render_csv(value)),
        OutputFormat::Minimal => println!("{}", minimal::render_minimal(value)),
    }
}

/// Pretty-print JSON to stdout.
fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// The `result.schedule` array of an analysis envelope, if present.
pub(crate) fn schedule_rows(value: &Value) -> Option<&Vec<Value>> {
    value.get("result")?.get("schedule")?.as_array()
}

pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
