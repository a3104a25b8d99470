//! recforge Object Cache
//!
//! Durable, compressed storage for expensive intermediate objects, addressed
//! by `(category, identifier)` inside a working directory.
//!
//! - Blobs are JSON inside a Zstandard frame (`.json.zst`)
//! - Writes land atomically through a temporary file and rename
//! - Unreadable blobs and identity mismatches are misses, not errors
//!
//! # Example
//!
//! ```rust,ignore
//! use recforge_cache::ObjectCache;
//! use serde_json::json;
//!
//! let cache = ObjectCache::new("/tmp/work");
//! cache.store("design", &json!({"columns": 3}), Some(&run_id))?;
//! let design: Option<serde_json::Value> = cache.load("design", Some(&run_id))?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod codec;
mod error;
mod store;

pub use codec::{decode, encode, load_compressed, store_compressed, CACHE_EXTENSION, DEFAULT_LEVEL};
pub use error::{CacheError, CacheResult, CodecError};
pub use store::{cache_file_name, CacheObject, Identity, ObjectCache, IDENTIFIER_PREFIX_LEN};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
