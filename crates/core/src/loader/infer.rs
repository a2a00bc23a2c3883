//! Cell type inference for delimited text

use crate::dataset::{StorageType, Value};
use crate::profile::parse_datetime;

/// Storage type shared by every non-blank cell
///
/// Numeric wins over DateTime, so bare years load as numbers. A column of
/// blanks is Text.
pub fn infer_storage(cells: &[String]) -> StorageType {
    let mut present = cells.iter().map(|c| c.trim()).filter(|c| !c.is_empty()).peekable();
    if present.peek().is_none() {
        return StorageType::Text;
    }

    let present: Vec<&str> = present.collect();
    if present.iter().all(|c| parse_number(c).is_some()) {
        StorageType::Numeric
    } else if present.iter().all(|c| parse_datetime(c).is_some()) {
        StorageType::DateTime
    } else {
        StorageType::Text
    }
}

/// Convert raw cells to values of the given storage type
///
/// Blank cells of numeric or datetime columns become `Null`; text cells
/// are kept verbatim.
pub fn convert_cells(cells: Vec<String>, storage: StorageType) -> Vec<Value> {
    match storage {
        StorageType::Numeric => cells
            .iter()
            .map(|c| parse_number(c.trim()).map_or(Value::Null, Value::Number))
            .collect(),
        StorageType::DateTime => cells
            .iter()
            .map(|c| parse_datetime(c).map_or(Value::Null, |(dt, _)| Value::DateTime(dt)))
            .collect(),
        _ => cells.into_iter().map(Value::Text).collect(),
    }
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|n| n.is_finite())
}
