//! Metadata subject

use crate::error::{MetadataError, MetadataResult};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// An input file whose metadata is being resolved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub path: PathBuf,
    #[serde(default)]
    pub tags: IndexMap<String, String>,
    #[serde(default)]
    pub metadata: IndexMap<String, Value>,
}

impl Subject {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `key` holds a non-null value
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.metadata.get(key).is_some_and(|v| !v.is_null())
    }

    /// Decode a metadata value
    ///
    /// # Errors
    /// Returns error if the stored value does not decode into `T`
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> MetadataResult<Option<T>> {
        match self.metadata.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|source| MetadataError::InvalidValue {
                    key: key.to_string(),
                    source,
                }),
        }
    }
}
