// JSON → CSV rendering for the converter panel.
use serde_json::{Map, Value};

use crate::convert::json_utils::{json_type_name, scalar_text};
use crate::error::{Result, ToolError};

fn err<T: std::fmt::Display>(msg: T) -> ToolError {
    ToolError::operational(msg.to_string())
}

/// Renders JSON as CSV with CRLF record separators and no trailing terminator.
///
/// * an array of objects becomes a header row (union of keys, first-seen order)
///   plus one row per object; missing keys yield empty cells;
/// * a single object becomes a header row plus one row;
/// * any other array becomes one row per item: arrays spread into cells, objects
///   contribute their values, scalars fill a single cell.
///
/// Nested values are written as compact JSON, `null` as an empty cell.
pub fn json_to_csv(value: &Value) -> Result<String> {
    let rows = match value {
        Value::Object(map) => records_to_rows(&[map]),
        Value::Array(items) => {
            let objects: Option<Vec<&Map<String, Value>>> =
                items.iter().map(Value::as_object).collect();
            match objects {
                Some(records) => records_to_rows(&records),
                None => items.iter().map(item_to_row).collect(),
            }
        }
        other => {
            return Err(ToolError::validation(format!(
                "CSV output needs an object or an array, got {}",
                json_type_name(other)
            )));
        }
    };
    write_rows(&rows)
}

fn records_to_rows(records: &[&Map<String, Value>]) -> Vec<Vec<String>> {
    let mut fields: Vec<&str> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !fields.contains(&key.as_str()) {
                fields.push(key);
            }
        }
    }
    if fields.is_empty() {
        return Vec::new();
    }
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(fields.iter().map(|f| f.to_string()).collect());
    for record in records {
        rows.push(
            fields
                .iter()
                .map(|field| record.get(*field).map(scalar_text).unwrap_or_default())
                .collect(),
        );
    }
    rows
}

fn item_to_row(item: &Value) -> Vec<String> {
    match item {
        Value::Array(cells) => cells.iter().map(scalar_text).collect(),
        Value::Object(map) => map.values().map(scalar_text).collect(),
        scalar => vec![scalar_text(scalar)],
    }
}

fn write_rows(rows: &[Vec<String>]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        if row.is_empty() {
            wtr.write_record([""]).map_err(err)?;
        } else {
            wtr.write_record(row).map_err(err)?;
        }
    }
    let bytes = wtr.into_inner().map_err(err)?;
    let text = String::from_utf8(bytes).map_err(err)?;
    Ok(text.strip_suffix("\r\n").unwrap_or(&text).to_string())
}
