//! Error types for the object cache
//!
//! A blob that cannot be decoded is never an error at the cache level: it
//! is reported as a miss. [`CodecError`] only surfaces from the raw codec
//! helpers; [`CacheError`] covers I/O around the cache directory.

use std::path::PathBuf;

/// Errors while encoding or decoding a blob
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Compression stream failed
    #[error("compression error: {0}")]
    Compression(#[source] std::io::Error),

    /// Object does not (de)serialize
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors during cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// IO error on a cache path
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Object could not be encoded for storage
    #[error("cannot encode object for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

impl CacheError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for cache operations
pub type CacheResult<T> = Result<T, CacheError>;
