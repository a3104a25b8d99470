//! Result records
//!
//! A [`RecordDraft`] is the loosely-typed form used while records are being
//! assembled, expanded and scrubbed. A [`ResultRecord`] is what comes out of
//! schema validation: tags and paths are strings, key order is preserved.

use crate::group::Group;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key/value storage for one partition, in insertion order
pub type Partition = IndexMap<String, Value>;

/// A record under construction
///
/// `reports` only exists once something has been written to it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordDraft {
    pub tags: Partition,
    pub metadata: Partition,
    pub images: Partition,
    pub vals: Partition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports: Option<Partition>,
}

impl RecordDraft {
    /// Create draft with every partition empty
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get partition, if it exists
    #[must_use]
    pub fn group(&self, group: Group) -> Option<&Partition> {
        match group {
            Group::Tags => Some(&self.tags),
            Group::Metadata => Some(&self.metadata),
            Group::Images => Some(&self.images),
            Group::Vals => Some(&self.vals),
            Group::Reports => self.reports.as_ref(),
        }
    }

    /// Get partition for writing, creating `reports` on first use
    pub fn group_mut(&mut self, group: Group) -> &mut Partition {
        match group {
            Group::Tags => &mut self.tags,
            Group::Metadata => &mut self.metadata,
            Group::Images => &mut self.images,
            Group::Vals => &mut self.vals,
            Group::Reports => self.reports.get_or_insert_with(Partition::new),
        }
    }

    /// Remove a key from a partition, returning the old value
    pub fn remove(&mut self, group: Group, key: &str) -> Option<Value> {
        match group {
            Group::Reports => self.reports.as_mut()?.shift_remove(key),
            other => self.group_mut(other).shift_remove(key),
        }
    }
}

/// A validated result record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Entity tags, e.g. `sub`, `task`, `stat`
    #[serde(default)]
    pub tags: IndexMap<String, String>,

    #[serde(default)]
    pub metadata: Partition,

    /// Image paths keyed by image kind
    #[serde(default)]
    pub images: IndexMap<String, String>,

    #[serde(default)]
    pub vals: Partition,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports: Option<IndexMap<String, String>>,
}

impl ResultRecord {
    #[inline]
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn image(&self, key: &str) -> Option<&str> {
        self.images.get(key).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn report(&self, key: &str) -> Option<&str> {
        self.reports.as_ref()?.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reports_created_on_first_write() {
        let mut draft = RecordDraft::new();
        assert!(draft.group(Group::Reports).is_none());

        draft
            .group_mut(Group::Reports)
            .insert("svg".into(), json!("/r/a.svg"));
        assert_eq!(draft.group(Group::Reports).unwrap().len(), 1);
    }

    #[test]
    fn remove_missing_key_is_none() {
        let mut draft = RecordDraft::new();
        assert!(draft.remove(Group::Tags, "contrast").is_none());
        assert!(draft.remove(Group::Reports, "svg").is_none());
        assert!(draft.reports.is_none());
    }

    #[test]
    fn remove_preserves_order_of_remaining_keys() {
        let mut draft = RecordDraft::new();
        for key in ["a", "b", "c"] {
            draft.tags.insert(key.into(), json!(key));
        }
        draft.remove(Group::Tags, "b");
        let keys: Vec<_> = draft.tags.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn record_serializes_without_absent_reports() {
        let record = ResultRecord::default();
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("reports").is_none());
        assert_eq!(value["tags"], json!({}));
    }
}
