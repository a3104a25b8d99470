//! Provider chain

use crate::error::MetadataResult;
use crate::provider::MetadataProvider;
use crate::subject::Subject;
use std::fmt;

/// Ordered collection of metadata providers; first success wins
#[derive(Default)]
pub struct MetadataResolver {
    providers: Vec<Box<dyn MetadataProvider>>,
}

impl MetadataResolver {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider
    ///
    /// Providers with equal priority keep registration order.
    pub fn register<P: MetadataProvider + 'static>(&mut self, provider: P) {
        self.providers.push(Box::new(provider));
        self.providers
            .sort_by_key(|p| std::cmp::Reverse(p.priority()));
    }

    #[must_use]
    pub fn with_provider<P: MetadataProvider + 'static>(mut self, provider: P) -> Self {
        self.register(provider);
        self
    }

    /// Provider names in consultation order
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Ensure `key` is present on `subject`
    ///
    /// Returns `true` if the key already held a non-null value or a provider
    /// filled it, `false` if every provider declined.
    ///
    /// # Errors
    /// Returns the first provider error encountered
    pub fn fill(&self, subject: &mut Subject, key: &str) -> MetadataResult<bool> {
        if subject.has(key) {
            return Ok(true);
        }

        for provider in &self.providers {
            if provider.fill(subject, key)? {
                tracing::debug!(
                    key,
                    provider = provider.name(),
                    path = %subject.path().display(),
                    "resolved metadata"
                );
                return Ok(true);
            }
        }

        tracing::debug!(key, path = %subject.path().display(), "no provider resolved metadata");
        Ok(false)
    }

    /// Fill several keys; returns those left unresolved
    ///
    /// # Errors
    /// Returns the first provider error encountered
    pub fn fill_all<'k, I>(&self, subject: &mut Subject, keys: I) -> MetadataResult<Vec<&'k str>>
    where
        I: IntoIterator<Item = &'k str>,
    {
        let mut missing = Vec::new();
        for key in keys {
            if !self.fill(subject, key)? {
                missing.push(key);
            }
        }
        Ok(missing)
    }
}

impl fmt::Debug for MetadataResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataResolver")
            .field("providers", &self.provider_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;
    use crate::provider::{DefaultsProvider, FnProvider, SidecarProvider};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn sidecar() -> SidecarProvider {
        SidecarProvider::new().with_document(
            "/data/bold.nii.gz",
            IndexMap::from([("repetition_time".to_string(), json!(2.0))]),
        )
    }

    #[test]
    fn providers_are_ordered_by_priority() {
        let resolver = MetadataResolver::new()
            .with_provider(DefaultsProvider::new())
            .with_provider(FnProvider::new("table", |_, _| Ok(None)))
            .with_provider(sidecar());
        assert_eq!(resolver.provider_names(), vec!["sidecar", "table", "defaults"]);
    }

    #[test]
    fn present_value_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let resolver = MetadataResolver::new().with_provider(FnProvider::new("counting", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Some(json!(1)))
        }));

        let mut subject = Subject::new("/data/bold.nii.gz").with_metadata("repetition_time", json!(3.0));
        assert!(resolver.fill(&mut subject, "repetition_time").unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(subject.metadata["repetition_time"], json!(3.0));
    }

    #[test]
    fn first_success_wins() {
        let resolver = MetadataResolver::new()
            .with_provider(DefaultsProvider::new().with_default("repetition_time", 1.0))
            .with_provider(sidecar());

        let mut subject = Subject::new("/data/bold.nii.gz");
        assert!(resolver.fill(&mut subject, "repetition_time").unwrap());
        assert_eq!(subject.metadata["repetition_time"], json!(2.0));
    }

    #[test]
    fn falls_through_to_defaults() {
        let resolver = MetadataResolver::new()
            .with_provider(sidecar())
            .with_provider(DefaultsProvider::new().with_default("slice_encoding_direction", "k"));

        let mut subject = Subject::new("/data/other.nii.gz");
        let missing = resolver
            .fill_all(&mut subject, ["slice_encoding_direction", "echo_time"])
            .unwrap();
        assert_eq!(missing, vec!["echo_time"]);
        assert_eq!(subject.metadata["slice_encoding_direction"], json!("k"));
    }

    #[test]
    fn provider_errors_propagate() {
        let resolver = MetadataResolver::new().with_provider(FnProvider::new("broken", |_, key| {
            Err(MetadataError::provider("broken", key, "table unavailable"))
        }));
        let err = resolver
            .fill(&mut Subject::new("/data/a.nii"), "age")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "provider 'broken' failed on 'age': table unavailable"
        );
    }
}
