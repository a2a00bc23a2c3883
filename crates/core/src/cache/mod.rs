//! Dataset materialization and caching
//!
//! A [`Materializer`] turns a JSON descriptor into a dataset. Wrapping one
//! in a [`CachedMaterializer`] with a [`SharedDatasetCache`] handle reuses
//! datasets materialized within the cache's TTL. The cache is always passed
//! explicitly; there is no process-wide instance.
//!
//! ## Example
//!
//! ```rust,ignore
//! use table_fusion_core::cache::{
//!     CacheConfig, CachedMaterializer, FileMaterializer, Materializer, SharedDatasetCache,
//! };
//!
//! let cache = SharedDatasetCache::with_config(&CacheConfig::default());
//! let materializer = CachedMaterializer::new(FileMaterializer::new(), cache.clone());
//! let cities = materializer.materialize(&json!({"path": "cities.csv"}))?;
//! ```

mod error;
mod materialize;
mod store;

pub use error::{CacheError, CacheResult, MaterializeError, MaterializeResult};
pub use materialize::{CachedMaterializer, FileMaterializer, Materializer};
pub use store::{CacheConfig, CacheStats, DatasetCache, SharedDatasetCache, fingerprint};
