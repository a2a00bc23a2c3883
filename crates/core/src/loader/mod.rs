//! Dataset loaders
//!
//! Turn files and byte streams into [`Dataset`]s. Column storage types are
//! inferred from the cells: a column is numeric when every non-blank cell
//! parses as a number, datetime when every non-blank cell parses as a
//! date/time, and text otherwise.
//!
//! ## Example
//!
//! ```rust,ignore
//! use table_fusion_core::loader::{CsvLoader, DatasetLoader};
//!
//! let cities = CsvLoader::new().load(Path::new("cities.csv"))?;
//! let stations = CsvLoader::tsv().load(Path::new("stations.tsv"))?;
//! ```

mod delimited;
mod error;
mod infer;
mod json;

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

pub use delimited::CsvLoader;
pub use error::{LoadError, LoadResult};
pub use infer::{convert_cells, infer_storage};
pub use json::JsonRecordsLoader;

use crate::dataset::Dataset;

/// Source of datasets
pub trait DatasetLoader: Send + Sync {
    /// Load a dataset from a byte stream
    fn load_reader(&self, name: &str, reader: &mut dyn Read) -> LoadResult<Dataset>;

    /// Load a dataset from a file, named after the file
    fn load(&self, path: &Path) -> LoadResult<Dataset> {
        let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.load_reader(&name, &mut BufReader::new(file))
    }
}

/// Pick a loader from a file extension
///
/// `.json` loads records, `.tsv`/`.tab` tab-separated text; anything else
/// is read as comma-separated.
pub fn loader_for_path(path: &Path) -> Box<dyn DatasetLoader> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => Box::new(JsonRecordsLoader::new()),
        Some("tsv") | Some("tab") => Box::new(CsvLoader::tsv()),
        _ => Box::new(CsvLoader::new()),
    }
}
