//! Dataset materialization

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, info};

use super::error::{MaterializeError, MaterializeResult};
use super::store::{SharedDatasetCache, fingerprint};
use crate::dataset::Dataset;
use crate::loader::{CsvLoader, DatasetLoader, JsonRecordsLoader, loader_for_path};

/// Turns a descriptor into a dataset
///
/// A descriptor is any JSON value identifying a dataset: a file path with
/// options, a query, a search result id.
pub trait Materializer: Send + Sync {
    fn materialize(&self, descriptor: &JsonValue) -> MaterializeResult<Arc<Dataset>>;
}

/// Materializes local files
///
/// Descriptor shape: `{"path": "...", "format": "csv" | "tsv" | "json",
/// "delimiter": ";", "headers": true}`. Everything but `path` is optional;
/// the format defaults to the file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileMaterializer;

impl FileMaterializer {
    pub fn new() -> Self {
        Self
    }

    fn loader(
        descriptor: &JsonValue,
        path: &std::path::Path,
    ) -> MaterializeResult<Box<dyn DatasetLoader>> {
        let format = descriptor.get("format").and_then(JsonValue::as_str);
        let delimiter = match descriptor.get("delimiter") {
            None => None,
            Some(JsonValue::String(s)) if s.len() == 1 => Some(s.as_bytes()[0]),
            Some(other) => {
                return Err(MaterializeError::InvalidDescriptor(format!(
                    "delimiter must be a single ASCII character, got {other}"
                )));
            }
        };
        let headers = descriptor.get("headers").and_then(JsonValue::as_bool);

        let mut loader = match format {
            Some("json") => return Ok(Box::new(JsonRecordsLoader::new())),
            Some("tsv") => CsvLoader::tsv(),
            Some("csv") => CsvLoader::new(),
            Some(other) => {
                return Err(MaterializeError::InvalidDescriptor(format!(
                    "unknown format '{other}'"
                )));
            }
            None if delimiter.is_none() && headers.is_none() => return Ok(loader_for_path(path)),
            None => CsvLoader::new(),
        };
        if let Some(delimiter) = delimiter {
            loader = loader.with_delimiter(delimiter);
        }
        if let Some(headers) = headers {
            loader = loader.with_headers(headers);
        }
        Ok(Box::new(loader))
    }
}

impl Materializer for FileMaterializer {
    fn materialize(&self, descriptor: &JsonValue) -> MaterializeResult<Arc<Dataset>> {
        let path = descriptor
            .get("path")
            .and_then(JsonValue::as_str)
            .map(PathBuf::from)
            .ok_or_else(|| MaterializeError::InvalidDescriptor("missing 'path'".to_string()))?;

        let loader = Self::loader(descriptor, &path)?;
        let dataset = loader.load(&path)?;
        info!(
            path = %path.display(),
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Materialized dataset"
        );
        Ok(Arc::new(dataset))
    }
}

/// Consults a shared cache before calling through to another materializer
#[derive(Debug, Clone)]
pub struct CachedMaterializer<M> {
    inner: M,
    cache: SharedDatasetCache,
}

impl<M: Materializer> CachedMaterializer<M> {
    pub fn new(inner: M, cache: SharedDatasetCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &SharedDatasetCache {
        &self.cache
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

impl<M: Materializer> Materializer for CachedMaterializer<M> {
    fn materialize(&self, descriptor: &JsonValue) -> MaterializeResult<Arc<Dataset>> {
        let key = fingerprint(descriptor)?;
        if let Some(dataset) = self.cache.lock()?.get_by_key(&key) {
            debug!(key = %key, "Dataset cache hit");
            return Ok(dataset);
        }

        // Lock is not held while loading; concurrent misses may load twice.
        let dataset = self.inner.materialize(descriptor)?;
        let dataset = Arc::try_unwrap(dataset).unwrap_or_else(|shared| (*shared).clone());
        Ok(self.cache.lock()?.insert_by_key(key, dataset))
    }
}
