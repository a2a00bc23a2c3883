//! Delimited text loader

use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::LoadResult;
use super::infer::{convert_cells, infer_storage};
use super::DatasetLoader;
use crate::dataset::{Column, Dataset};

/// Loads CSV, TSV and other single-byte-delimited files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CsvLoader {
    /// Field delimiter
    pub delimiter: u8,
    /// Whether the first record holds column names
    pub has_headers: bool,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
        }
    }
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tab-separated values with a header row
    pub fn tsv() -> Self {
        Self::default().with_delimiter(b'\t')
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }
}

impl DatasetLoader for CsvLoader {
    fn load_reader(&self, name: &str, reader: &mut dyn Read) -> LoadResult<Dataset> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .from_reader(reader);

        let mut names: Vec<String> = if self.has_headers {
            rdr.headers()?.iter().map(str::to_string).collect()
        } else {
            Vec::new()
        };

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
        let mut rows = 0usize;
        for record in rdr.records() {
            let record = record?;
            if rows == 0 && cells.is_empty() {
                cells = vec![Vec::new(); record.len()];
            }
            for (column, field) in cells.iter_mut().zip(record.iter()) {
                column.push(field.to_string());
            }
            rows += 1;
        }

        if names.is_empty() {
            names = (1..=cells.len()).map(|i| format!("column_{i}")).collect();
        }

        let columns = names
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| {
                let storage = infer_storage(&raw);
                Column::new(name, convert_cells(raw, storage))
            })
            .collect();

        let dataset = Dataset::new(name, columns)?;
        debug!(
            dataset = name,
            rows,
            columns = dataset.column_count(),
            "Loaded delimited dataset"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{StorageType, Value};
    use crate::loader::LoadError;

    fn load(loader: &CsvLoader, text: &str) -> LoadResult<Dataset> {
        loader.load_reader("test", &mut text.as_bytes())
    }

    #[test]
    fn test_load_with_headers() {
        let dataset = load(
            &CsvLoader::new(),
            "city,population,founded\nBerlin,3.6,1237-01-01\nParis,,1100-06-01\n",
        )
        .unwrap();

        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.column_index("population"), Some(1));
        assert_eq!(dataset.columns()[1].storage(), StorageType::Numeric);
        assert_eq!(dataset.value(1, 1), Some(&Value::Null));
        assert_eq!(dataset.columns()[2].storage(), StorageType::DateTime);
        assert_eq!(dataset.value(0, 0), Some(&Value::from("Berlin")));
    }

    #[test]
    fn test_load_without_headers() {
        let loader = CsvLoader::tsv().with_headers(false);
        let dataset = load(&loader, "a\t1\nb\t2\n").unwrap();
        assert_eq!(dataset.columns()[0].name(), "column_1");
        assert_eq!(dataset.columns()[1].name(), "column_2");
        assert_eq!(dataset.row_count(), 2);
    }

    #[test]
    fn test_ragged_record_is_rejected() {
        let result = load(&CsvLoader::new(), "a,b\n1,2\n3\n");
        assert!(matches!(result, Err(LoadError::Csv(_))));
    }

    #[test]
    fn test_duplicate_header_is_rejected() {
        let result = load(&CsvLoader::new(), "a,a\n1,2\n");
        assert!(matches!(result, Err(LoadError::Dataset(_))));
    }

    #[test]
    fn test_headers_only() {
        let dataset = load(&CsvLoader::new(), "a,b\n").unwrap();
        assert_eq!(dataset.column_count(), 2);
        assert_eq!(dataset.row_count(), 0);
    }
}
