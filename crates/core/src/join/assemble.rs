//! Merged table assembly

use crate::dataset::{Column, Dataset, DatasetResult, Value};
use crate::matching::MatchResult;

/// Build the joined table
///
/// Left columns come first and unchanged. Right columns whose name is not
/// already a left column follow in their original order; matched rows take
/// the right row's values and unmatched rows get nulls.
pub fn assemble(left: &Dataset, right: &Dataset, matches: &MatchResult) -> DatasetResult<Dataset> {
    let mut by_left = matches.right_rows_by_left();
    by_left.resize(left.row_count(), None);

    let mut columns: Vec<Column> = left.columns().to_vec();
    for column in right.columns() {
        if left.has_column(column.name()) {
            continue;
        }
        let values = by_left
            .iter()
            .map(|right_row| {
                right_row
                    .and_then(|row| column.get(row))
                    .cloned()
                    .unwrap_or(Value::Null)
            })
            .collect();
        let mut appended = Column::new(column.name(), values);
        if let Some(hint) = column.semantic_hint() {
            appended = appended.with_semantic_hint(hint);
        }
        columns.push(appended);
    }

    Dataset::new(left.name(), columns)
}
