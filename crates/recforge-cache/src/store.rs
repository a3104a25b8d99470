//! Identifier-addressed object cache on disk
//!
//! Blobs live flat inside one working directory, named
//! `<category>.<first 8 chars of identifier>.json.zst`. The short prefix in
//! the file name is only an address; the full identifier is checked against
//! the object itself on read through [`CacheObject::identity`].

use crate::codec::{load_compressed, store_compressed, CACHE_EXTENSION, DEFAULT_LEVEL};
use crate::error::{CacheError, CacheResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

/// Number of identifier characters kept in a cache file name
pub const IDENTIFIER_PREFIX_LEN: usize = 8;

/// Build the cache file name for a category and optional identifier
#[must_use]
pub fn cache_file_name(category: &str, identifier: Option<&dyn fmt::Display>) -> String {
    match identifier {
        Some(id) => {
            let id = id.to_string();
            let prefix: String = id.chars().take(IDENTIFIER_PREFIX_LEN).collect();
            format!("{category}.{prefix}.{CACHE_EXTENSION}")
        }
        None => format!("{category}.{CACHE_EXTENSION}"),
    }
}

/// Identity an object carries about itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity<'a> {
    /// Object has no notion of identity; any identifier matches
    Untracked,
    /// Object tracks identity but has none assigned
    Missing,
    /// Object carries this identifier
    Id(Cow<'a, str>),
}

impl Identity<'_> {
    /// Whether an object with this identity satisfies a lookup for `expected`
    #[must_use]
    pub fn matches(&self, expected: &str) -> bool {
        match self {
            Self::Untracked => true,
            Self::Missing => false,
            Self::Id(id) => id == expected,
        }
    }

    /// Identifier to address the object by when none is given explicitly
    #[must_use]
    pub fn as_id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            Self::Untracked | Self::Missing => None,
        }
    }
}

/// An object that can be stored in an [`ObjectCache`]
pub trait CacheObject: Serialize + DeserializeOwned {
    /// Identity recorded on the object itself
    fn identity(&self) -> Identity<'_> {
        Identity::Untracked
    }
}

impl CacheObject for serde_json::Value {}

/// Durable, compressed object cache rooted at a working directory
#[derive(Debug, Clone)]
pub struct ObjectCache {
    workdir: PathBuf,
    level: i32,
}

impl ObjectCache {
    /// Create cache rooted at `workdir`
    #[must_use]
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            level: DEFAULT_LEVEL,
        }
    }

    /// Set the Zstandard compression level for writes
    #[must_use]
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    #[inline]
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    #[inline]
    #[must_use]
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Path a blob for `(category, identifier)` lives at
    #[must_use]
    pub fn path_for(&self, category: &str, identifier: Option<&dyn fmt::Display>) -> PathBuf {
        self.workdir.join(cache_file_name(category, identifier))
    }

    /// Whether a blob exists for `(category, identifier)`
    ///
    /// Does not check that the blob decodes.
    #[must_use]
    pub fn contains(&self, category: &str, identifier: Option<&dyn fmt::Display>) -> bool {
        self.path_for(category, identifier).is_file()
    }

    /// Load the object cached for `(category, identifier)`
    ///
    /// Returns `Ok(None)` on a miss: no blob, an unreadable blob, or an
    /// object whose own identity does not match `identifier`.
    ///
    /// # Errors
    /// Returns error only if an existing blob cannot be read from disk
    pub fn load<T: CacheObject>(
        &self,
        category: &str,
        identifier: Option<&dyn fmt::Display>,
    ) -> CacheResult<Option<T>> {
        let path = self.path_for(category, identifier);
        let Some(obj) = load_compressed::<T>(&path)? else {
            return Ok(None);
        };

        if let Some(expected) = identifier.map(ToString::to_string) {
            let identity = obj.identity();
            if !identity.matches(&expected) {
                tracing::debug!(
                    path = %path.display(),
                    expected = %expected,
                    found = ?identity.as_id(),
                    "cached object identity does not match"
                );
                return Ok(None);
            }
        }

        tracing::info!(category, path = %path.display(), "cached {category} from {}", path.display());
        Ok(Some(obj))
    }

    /// Store `obj` under `(category, identifier)`
    ///
    /// Without an explicit identifier, the object's own identity is used.
    /// An existing blob is overwritten with a warning. Returns the path
    /// written.
    ///
    /// # Errors
    /// Returns error if the working directory cannot be created or the blob
    /// cannot be encoded or written
    pub fn store<T: CacheObject>(
        &self,
        category: &str,
        obj: &T,
        identifier: Option<&dyn fmt::Display>,
    ) -> CacheResult<PathBuf> {
        let identity = obj.identity();
        let own_id = identity.as_id();
        let identifier = identifier.or(own_id.as_ref().map(|id| id as &dyn fmt::Display));
        let path = self.path_for(category, identifier);

        std::fs::create_dir_all(&self.workdir)
            .map_err(|e| CacheError::io_error(&self.workdir, e))?;

        if path.exists() {
            tracing::warn!(path = %path.display(), "overwriting cached {category}");
        }

        store_compressed(&path, obj, self.level)?;
        tracing::debug!(category, path = %path.display(), "stored cache blob");
        Ok(path)
    }

    /// Load the cached object, or compute and store it on a miss
    ///
    /// # Errors
    /// Returns error from `compute` or from cache I/O
    pub fn load_or_store_with<T, E, F>(
        &self,
        category: &str,
        identifier: Option<&dyn fmt::Display>,
        compute: F,
    ) -> Result<T, E>
    where
        T: CacheObject,
        E: From<CacheError>,
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(cached) = self.load(category, identifier)? {
            return Ok(cached);
        }

        let obj = compute()?;
        self.store(category, &obj, identifier)?;
        Ok(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Fit {
        id: Option<String>,
        beta: Vec<f64>,
    }

    impl CacheObject for Fit {
        fn identity(&self) -> Identity<'_> {
            match &self.id {
                Some(id) => Identity::Id(Cow::Borrowed(id)),
                None => Identity::Missing,
            }
        }
    }

    fn fit(id: Option<&str>) -> Fit {
        Fit {
            id: id.map(str::to_string),
            beta: vec![0.5, -1.25],
        }
    }

    #[test]
    fn file_name_truncates_identifier() {
        assert_eq!(
            cache_file_name("model", Some(&"0123456789abcdef")),
            "model.01234567.json.zst"
        );
        assert_eq!(cache_file_name("spec", None), "spec.json.zst");
        assert_eq!(cache_file_name("short", Some(&"abc")), "short.abc.json.zst");
    }

    #[test]
    fn store_uses_own_identity_when_none_given() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ObjectCache::new(dir.path());
        let path = cache.store("fit", &fit(Some("deadbeefcafe")), None).unwrap();
        assert_eq!(path, dir.path().join("fit.deadbeef.json.zst"));
    }

    #[test]
    fn hit_requires_matching_identity() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ObjectCache::new(dir.path());
        cache.store("fit", &fit(Some("deadbeef-0001")), None).unwrap();

        let hit: Option<Fit> = cache.load("fit", Some(&"deadbeef-0001")).unwrap();
        assert_eq!(hit, Some(fit(Some("deadbeef-0001"))));

        // Same eight-character prefix, different identifier
        let miss: Option<Fit> = cache.load("fit", Some(&"deadbeef-0002")).unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn object_without_identity_misses_identified_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ObjectCache::new(dir.path());
        cache.store("fit", &fit(None), Some(&"feedface")).unwrap();

        let out: Option<Fit> = cache.load("fit", Some(&"feedface")).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn untracked_objects_match_any_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ObjectCache::new(dir.path());
        cache.store("plain", &json!({"a": 1}), Some(&"12345678")).unwrap();
        let out: Option<serde_json::Value> = cache.load("plain", Some(&"12345678")).unwrap();
        assert_eq!(out, Some(json!({"a": 1})));
    }

    #[test]
    fn overwrite_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ObjectCache::new(dir.path());
        cache.store("plain", &json!(1), None).unwrap();
        cache.store("plain", &json!(2), None).unwrap();
        let out: Option<serde_json::Value> = cache.load("plain", None).unwrap();
        assert_eq!(out, Some(json!(2)));
    }

    #[test]
    fn store_creates_missing_workdir() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ObjectCache::new(dir.path().join("nested").join("cache"));
        cache.store("plain", &json!(null), None).unwrap();
        assert!(cache.contains("plain", None));
    }

    #[test]
    fn load_or_store_with_computes_once() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ObjectCache::new(dir.path());
        let mut calls = 0;

        for _ in 0..2 {
            let out: Result<Fit, CacheError> =
                cache.load_or_store_with("fit", Some(&"abcdef012345"), || {
                    calls += 1;
                    Ok(fit(Some("abcdef012345")))
                });
            assert_eq!(out.unwrap(), fit(Some("abcdef012345")));
        }
        assert_eq!(calls, 1);
    }
}
