//! Composite attribute expansion
//!
//! An image key shaped `<tag>_<attr>` (ASCII letters or digits, then
//! lowercase letters) encodes a tag value and an image kind at once. Expansion splits every
//! such key off into a derived record that carries the tag value under its
//! routed tag key and a single image keyed by the bare attribute.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use recforge_model::{Partition, RecordDraft};
use regex::Regex;
use serde_json::Value;

// The tag part admits uppercase letters and digits so that keys such as
// `taskA_ortho` or `cond1_zmap` expand; `T1w_mask` and `sub01_zmap` split too.
static COMPOSITE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<tag>[A-Za-z0-9]+)_(?P<attr>[a-z]+)$").expect("valid composite key pattern"));

/// Tag key used for attributes without a route
pub const DEFAULT_COMPOSITE_TAG: &str = "desc";

/// Routes composite attributes to tag keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeRule {
    routes: IndexMap<String, String>,
    fallback: String,
}

impl Default for CompositeRule {
    /// `ortho` routes to `stat`; everything else to `desc`
    fn default() -> Self {
        let mut routes = IndexMap::new();
        routes.insert("ortho".to_string(), "stat".to_string());
        Self {
            routes,
            fallback: DEFAULT_COMPOSITE_TAG.to_string(),
        }
    }
}

impl CompositeRule {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route an attribute to a tag key, replacing any previous route
    #[must_use]
    pub fn with_route(mut self, attribute: impl Into<String>, tag: impl Into<String>) -> Self {
        self.routes.insert(attribute.into(), tag.into());
        self
    }

    /// Split a composite key into `(tag value, attribute)`
    #[must_use]
    pub fn split(key: &str) -> Option<(&str, &str)> {
        let caps = COMPOSITE_KEY.captures(key)?;
        Some((caps.name("tag")?.as_str(), caps.name("attr")?.as_str()))
    }

    /// Tag key an attribute's tag value is stored under
    #[must_use]
    pub fn tag_for(&self, attribute: &str) -> &str {
        self.routes.get(attribute).unwrap_or(&self.fallback)
    }

    /// Split composite image keys off into derived records
    ///
    /// Originals keep their non-composite images and their position; derived
    /// records follow all originals, in the order they were produced.
    #[must_use]
    pub fn expand(&self, mut records: Vec<RecordDraft>) -> Vec<RecordDraft> {
        let mut derived = Vec::new();

        for record in &mut records {
            let images = std::mem::take(&mut record.images);
            for (key, value) in images {
                match Self::split(&key) {
                    Some((tag, attribute)) => {
                        derived.push(self.derive(record, tag, attribute, value));
                    }
                    None => {
                        record.images.insert(key, value);
                    }
                }
            }
        }

        if !derived.is_empty() {
            tracing::debug!(
                originals = records.len(),
                derived = derived.len(),
                "expanded composite image keys"
            );
        }
        records.extend(derived);
        records
    }

    fn derive(&self, origin: &RecordDraft, tag: &str, attribute: &str, image: Value) -> RecordDraft {
        let mut record = origin.clone();
        record
            .tags
            .insert(self.tag_for(attribute).to_string(), Value::from(tag));
        let mut images = Partition::new();
        images.insert(attribute.to_string(), image);
        record.images = images;
        record
    }
}
