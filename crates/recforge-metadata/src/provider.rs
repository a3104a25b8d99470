//! Metadata providers
//!
//! Each provider tries to fill one key on a [`Subject`] and reports whether
//! it did. Providers are consulted in priority order by
//! [`MetadataResolver`](crate::MetadataResolver).

use crate::error::MetadataResult;
use crate::subject::Subject;
use indexmap::IndexMap;
use serde_json::Value;
use std::path::PathBuf;

/// A strategy for resolving metadata keys
pub trait MetadataProvider: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Try to fill `key` on `subject`; `true` if it was filled
    ///
    /// # Errors
    /// Returns error if the provider's source fails
    fn fill(&self, subject: &mut Subject, key: &str) -> MetadataResult<bool>;

    /// Provider priority (higher = consulted first)
    fn priority(&self) -> i32 {
        0
    }
}

/// Per-file metadata documents held in memory
#[derive(Debug, Clone, Default)]
pub struct SidecarProvider {
    documents: IndexMap<PathBuf, IndexMap<String, Value>>,
}

impl SidecarProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a metadata document to a file path
    #[must_use]
    pub fn with_document(mut self, path: impl Into<PathBuf>, document: IndexMap<String, Value>) -> Self {
        self.documents.insert(path.into(), document);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, key: impl Into<String>, value: Value) {
        self.documents
            .entry(path.into())
            .or_default()
            .insert(key.into(), value);
    }
}

impl MetadataProvider for SidecarProvider {
    fn name(&self) -> &str {
        "sidecar"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn fill(&self, subject: &mut Subject, key: &str) -> MetadataResult<bool> {
        let value = self
            .documents
            .get(subject.path())
            .and_then(|doc| doc.get(key))
            .filter(|v| !v.is_null());
        match value {
            Some(value) => {
                subject.metadata.insert(key.to_string(), value.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Fixed fallback values, consulted last
#[derive(Debug, Clone, Default)]
pub struct DefaultsProvider {
    defaults: IndexMap<String, Value>,
}

impl DefaultsProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }
}

impl MetadataProvider for DefaultsProvider {
    fn name(&self) -> &str {
        "defaults"
    }

    fn priority(&self) -> i32 {
        -100
    }

    fn fill(&self, subject: &mut Subject, key: &str) -> MetadataResult<bool> {
        let Some(value) = self.defaults.get(key) else {
            return Ok(false);
        };
        subject.metadata.insert(key.to_string(), value.clone());
        Ok(true)
    }
}

type Lookup = dyn Fn(&Subject, &str) -> MetadataResult<Option<Value>> + Send + Sync;

/// Provider backed by a closure, e.g. a lookup into an external table
pub struct FnProvider {
    name: String,
    priority: i32,
    lookup: Box<Lookup>,
}

impl FnProvider {
    pub fn new<F>(name: impl Into<String>, lookup: F) -> Self
    where
        F: Fn(&Subject, &str) -> MetadataResult<Option<Value>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            priority: 0,
            lookup: Box::new(lookup),
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl std::fmt::Debug for FnProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProvider")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

impl MetadataProvider for FnProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn fill(&self, subject: &mut Subject, key: &str) -> MetadataResult<bool> {
        match (self.lookup)(subject, key)? {
            Some(value) if !value.is_null() => {
                subject.metadata.insert(key.to_string(), value);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sidecar_fills_only_its_own_path() {
        let provider = SidecarProvider::new().with_document(
            "/data/sub-01_bold.nii.gz",
            IndexMap::from([("repetition_time".to_string(), json!(2.0))]),
        );

        let mut hit = Subject::new("/data/sub-01_bold.nii.gz");
        assert!(provider.fill(&mut hit, "repetition_time").unwrap());
        assert_eq!(hit.metadata["repetition_time"], json!(2.0));

        let mut miss = Subject::new("/data/sub-02_bold.nii.gz");
        assert!(!provider.fill(&mut miss, "repetition_time").unwrap());
        assert!(miss.metadata.is_empty());
    }

    #[test]
    fn sidecar_null_is_not_a_value() {
        let mut provider = SidecarProvider::new();
        provider.insert("/data/a.nii", "echo_time", Value::Null);
        let mut subject = Subject::new("/data/a.nii");
        assert!(!provider.fill(&mut subject, "echo_time").unwrap());
    }

    #[test]
    fn closure_provider_sees_subject_tags() {
        let provider = FnProvider::new("table", |subject, key| {
            Ok((key == "group").then(|| json!(format!("group-{}", subject.tags["sub"]))))
        });
        let mut subject = Subject::new("/data/a.nii").with_tag("sub", "01");
        assert!(provider.fill(&mut subject, "group").unwrap());
        assert_eq!(subject.metadata["group"], json!("group-01"));
        assert!(!provider.fill(&mut subject, "age").unwrap());
    }
}
