//! CLI command implementations

pub mod augment;
pub mod profile;

use std::path::Path;

use table_fusion_core::dataset::Dataset;
use table_fusion_core::loader::{CsvLoader, DatasetLoader, loader_for_path};

use crate::cli::error::CliError;

/// Options for reading delimited input files
#[derive(Debug, Clone, Default)]
pub struct InputOptions {
    /// Field delimiter; the file extension decides when absent
    pub delimiter: Option<char>,
    /// Input files have no header row
    pub no_headers: bool,
}

impl InputOptions {
    /// Load a dataset, choosing the loader from the options or extension
    pub fn load(&self, path: &Path) -> Result<Dataset, CliError> {
        let loader: Box<dyn DatasetLoader> = if self.delimiter.is_some() || self.no_headers {
            let mut csv = CsvLoader::new().with_headers(!self.no_headers);
            if let Some(delimiter) = self.delimiter {
                let byte = u8::try_from(delimiter)
                    .ok()
                    .filter(u8::is_ascii)
                    .ok_or_else(|| {
                        CliError::InvalidArgument(format!("delimiter '{delimiter}' is not ASCII"))
                    })?;
                csv = csv.with_delimiter(byte);
            }
            Box::new(csv)
        } else {
            loader_for_path(path)
        };

        let dataset = loader.load(path).map_err(|source| CliError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Loaded dataset"
        );
        Ok(dataset)
    }
}
