//! Error types for caching and materialization

use thiserror::Error;

use crate::loader::LoadError;

/// Errors that can occur when using the dataset cache
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Descriptor could not be serialized for fingerprinting
    #[error("Cannot fingerprint descriptor: {0}")]
    Fingerprint(String),

    /// A thread panicked while holding the shared cache
    #[error("Dataset cache lock poisoned")]
    Poisoned,
}

/// Errors that can occur when materializing a dataset
#[derive(Error, Debug)]
pub enum MaterializeError {
    /// Descriptor lacks a required field or has an unusable value
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// Underlying loader failed
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Cache failure
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Result type for materialization
pub type MaterializeResult<T> = Result<T, MaterializeError>;
