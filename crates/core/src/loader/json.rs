//! JSON record array loader

use std::io::Read;

use serde_json::Value as JsonValue;
use tracing::debug;

use super::error::{LoadError, LoadResult};
use super::DatasetLoader;
use crate::dataset::{Column, Dataset, Value};
use crate::profile::parse_datetime;

/// Loads an array of flat JSON objects, one object per row
///
/// Columns appear in first-seen key order; keys absent from a record load
/// as `Null`. Strings that all parse as date/times become datetime cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonRecordsLoader;

impl JsonRecordsLoader {
    pub fn new() -> Self {
        Self
    }
}

impl DatasetLoader for JsonRecordsLoader {
    fn load_reader(&self, name: &str, reader: &mut dyn Read) -> LoadResult<Dataset> {
        let root: JsonValue = serde_json::from_reader(reader)?;
        let JsonValue::Array(records) = root else {
            return Err(LoadError::NotRecordArray);
        };

        let mut names: Vec<String> = Vec::new();
        let mut columns: Vec<Vec<Value>> = Vec::new();

        for (row, record) in records.iter().enumerate() {
            let JsonValue::Object(fields) = record else {
                return Err(LoadError::InvalidRecord {
                    row,
                    reason: format!("expected object, found {}", json_kind(record)),
                });
            };

            for (key, field) in fields {
                let value = json_to_value(field).ok_or_else(|| LoadError::InvalidRecord {
                    row,
                    reason: format!("field '{key}' is a nested {}", json_kind(field)),
                })?;

                let index = match names.iter().position(|n| n == key) {
                    Some(index) => index,
                    None => {
                        names.push(key.clone());
                        columns.push(vec![Value::Null; row]);
                        names.len() - 1
                    }
                };
                columns[index].push(value);
            }

            for column in &mut columns {
                column.resize(row + 1, Value::Null);
            }
        }

        let columns = names
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name, promote_datetimes(values)))
            .collect();

        let dataset = Dataset::new(name, columns)?;
        debug!(
            dataset = name,
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Loaded JSON records"
        );
        Ok(dataset)
    }
}

fn json_to_value(field: &JsonValue) -> Option<Value> {
    match field {
        JsonValue::Null => Some(Value::Null),
        JsonValue::Bool(b) => Some(Value::Text(b.to_string())),
        JsonValue::Number(n) => Some(n.as_f64().map_or(Value::Null, Value::Number)),
        JsonValue::String(s) => Some(Value::Text(s.clone())),
        JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Convert an all-text column whose non-blank cells all parse as date/times
fn promote_datetimes(values: Vec<Value>) -> Vec<Value> {
    let mut present = values
        .iter()
        .filter(|v| !v.is_missing() && v.as_str().is_none_or(|s| !s.trim().is_empty()))
        .peekable();
    if present.peek().is_none() {
        return values;
    }
    let all_datetime = present.all(|v| v.as_str().is_some_and(|s| parse_datetime(s).is_some()));
    if !all_datetime {
        return values;
    }

    values
        .into_iter()
        .map(|v| match v.as_str().and_then(parse_datetime) {
            Some((dt, _)) => Value::DateTime(dt),
            None => Value::Null,
        })
        .collect()
}
