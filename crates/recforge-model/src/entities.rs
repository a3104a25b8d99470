//! Entity vocabulary
//!
//! The closed set of tag keys a result record may carry. Tag partitions are
//! filtered against it; it never constrains tag values.

use crate::record::Partition;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Tag keys recognized out of the box
pub const DEFAULT_ENTITIES: &[&str] = &[
    "sub",
    "ses",
    "run",
    "task",
    "acq",
    "dir",
    "echo",
    "space",
    "desc",
    "stat",
    "model",
    "contrast",
    "taskcontrast",
    "feature",
    "setting",
    "sample",
];

/// Closed set of recognized tag keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityVocabulary {
    names: IndexSet<String>,
}

impl EntityVocabulary {
    /// Create empty vocabulary
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            names: IndexSet::new(),
        }
    }

    /// Create vocabulary from explicit names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Add names
    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Drop every tag whose key is not in the vocabulary
    ///
    /// Returns the number of keys removed.
    pub fn retain_known(&self, tags: &mut Partition) -> usize {
        let before = tags.len();
        tags.retain(|key, _| self.contains(key));
        before - tags.len()
    }
}

impl Default for EntityVocabulary {
    fn default() -> Self {
        Self::from_names(DEFAULT_ENTITIES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_knows_stat_and_desc() {
        let vocab = EntityVocabulary::default();
        assert!(vocab.contains("stat"));
        assert!(vocab.contains("desc"));
        assert!(!vocab.contains("figure"));
    }

    #[test]
    fn retain_known_drops_unknown_keys() {
        let vocab = EntityVocabulary::from_names(["sub", "task"]);
        let mut tags = Partition::new();
        tags.insert("sub".into(), json!("01"));
        tags.insert("hemisphere".into(), json!("L"));
        tags.insert("task".into(), json!("rest"));

        assert_eq!(vocab.retain_known(&mut tags), 1);
        assert_eq!(tags.len(), 2);
        assert!(!tags.contains_key("hemisphere"));
    }

    #[test]
    fn extend_adds_names() {
        let mut vocab = EntityVocabulary::empty();
        vocab.extend(["roi"]);
        assert!(vocab.contains("roi"));
        assert_eq!(vocab.len(), 1);
    }
}
