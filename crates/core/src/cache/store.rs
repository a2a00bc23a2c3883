//! TTL and capacity bounded dataset cache

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::error::{CacheError, CacheResult};
use crate::dataset::Dataset;

/// Cache limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    /// Seconds an entry stays fresh
    pub ttl_secs: u64,
    /// Maximum number of cached datasets; 0 disables caching
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            capacity: 32,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_secs = ttl.as_secs();
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Counters since the cache was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped to stay within capacity
    pub evictions: u64,
    /// Entries dropped because they went stale
    pub expirations: u64,
}

impl CacheStats {
    /// Hits over lookups, 0 before the first lookup
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    dataset: Arc<Dataset>,
    inserted: Instant,
    last_used: u64,
}

/// Materialized datasets keyed by descriptor fingerprint
///
/// Entries older than the TTL are treated as absent. When full, the least
/// recently used entry makes room.
#[derive(Debug)]
pub struct DatasetCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
    capacity: usize,
    clock: u64,
    stats: CacheStats,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::with_config(&CacheConfig::default())
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            ttl: config.ttl(),
            capacity: config.capacity,
            clock: 0,
            stats: CacheStats::default(),
        }
    }

    /// Look up a dataset, counting a hit or miss
    pub fn get(&mut self, descriptor: &JsonValue) -> CacheResult<Option<Arc<Dataset>>> {
        let key = fingerprint(descriptor)?;
        Ok(self.get_by_key(&key))
    }

    /// Look up by precomputed fingerprint
    pub fn get_by_key(&mut self, key: &str) -> Option<Arc<Dataset>> {
        self.clock += 1;
        let ttl = self.ttl;
        let stale = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.inserted.elapsed() >= ttl);
        if stale {
            self.entries.remove(key);
            self.stats.expirations += 1;
        }

        let clock = self.clock;
        let fresh = self.entries.get_mut(key).map(|entry| {
            entry.last_used = clock;
            Arc::clone(&entry.dataset)
        });

        if fresh.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        fresh
    }

    /// Store a dataset, returning the shared handle
    pub fn insert(
        &mut self,
        descriptor: &JsonValue,
        dataset: Dataset,
    ) -> CacheResult<Arc<Dataset>> {
        let key = fingerprint(descriptor)?;
        Ok(self.insert_by_key(key, dataset))
    }

    /// Store under a precomputed fingerprint
    pub fn insert_by_key(&mut self, key: String, dataset: Dataset) -> Arc<Dataset> {
        let dataset = Arc::new(dataset);
        if self.capacity == 0 {
            return dataset;
        }

        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                self.evict_least_recent();
            }
        }

        self.clock += 1;
        self.entries.insert(
            key,
            CacheEntry {
                dataset: Arc::clone(&dataset),
                inserted: Instant::now(),
                last_used: self.clock,
            },
        );
        dataset
    }

    /// Drop an entry
    pub fn invalidate(&mut self, descriptor: &JsonValue) -> CacheResult<bool> {
        let key = fingerprint(descriptor)?;
        Ok(self.entries.remove(&key).is_some())
    }

    /// Drop stale entries
    pub fn remove_expired(&mut self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.inserted.elapsed() < ttl);
        let removed = before - self.entries.len();
        self.stats.expirations += removed as u64;
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            debug!(key = %key, "Evicting cached dataset");
            self.entries.remove(&key);
            self.stats.evictions += 1;
        }
    }
}

/// Cloneable handle to a cache shared between materializers
#[derive(Debug, Clone, Default)]
pub struct SharedDatasetCache {
    inner: Arc<Mutex<DatasetCache>>,
}

impl SharedDatasetCache {
    pub fn new(cache: DatasetCache) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        Self::new(DatasetCache::with_config(config))
    }

    /// Lock the cache for a sequence of operations
    pub fn lock(&self) -> CacheResult<MutexGuard<'_, DatasetCache>> {
        self.inner.lock().map_err(|_| CacheError::Poisoned)
    }

    pub fn stats(&self) -> CacheResult<CacheStats> {
        Ok(self.lock()?.stats())
    }
}

/// SHA-256 of a descriptor's canonical JSON form
///
/// Object keys are sorted at every level, so descriptors that differ only
/// in key order share a fingerprint.
pub fn fingerprint(descriptor: &JsonValue) -> CacheResult<String> {
    let canonical = serde_json::to_vec(&canonicalize(descriptor))
        .map_err(|e| CacheError::Fingerprint(e.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(format!("{:x}", hasher.finalize()))
}

fn canonicalize(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            JsonValue::Object(sorted)
        }
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
