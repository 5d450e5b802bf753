use serde_json::Value;

use super::{format_value, schedule_rows, SCHEDULE_COLUMNS};

/// Render as CSV: the schedule rows when present, otherwise a two-column
/// field/value listing of the result.
pub fn render_csv(value: &Value) -> String {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    if let Some(rows) = schedule_rows(value) {
        let _ = wtr.write_record(SCHEDULE_COLUMNS);
        for row in rows {
            let record: Vec<String> = SCHEDULE_COLUMNS
                .iter()
                .map(|col| row.get(*col).map(format_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    } else {
        let fields = value
            .as_object()
            .and_then(|m| m.get("result"))
            .and_then(Value::as_object)
            .or_else(|| value.as_object());

        match fields {
            Some(map) => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_value(val)]);
                }
            }
            None => {
                let _ = wtr.write_record([format_value(value)]);
            }
        }
    }

    wtr.into_inner()
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_csv_schedule_rows() {
        let value = json!({
            "result": {
                "monthly_payment": "2307.25",
                "schedule": [
                    {"month": 1, "payment": "2307.25", "principal": "1890.58", "interest": "416.67", "balance": "48109.42"}
                ]
            }
        });
        let out = render_csv(&value);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("month,payment,principal,interest,balance"));
        assert_eq!(lines.next(), Some("1,2307.25,1890.58,416.67,48109.42"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_summary_fields() {
        let value = json!({"result": {"monthly_payment": "10000.00", "overpayment": "0.00"}});
        let out = render_csv(&value);
        assert!(out.starts_with("field,value\n"));
        assert!(out.contains("monthly_payment,10000.00"));
        assert!(out.contains("overpayment,0.00"));
    }
}
