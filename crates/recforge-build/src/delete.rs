//! Key scrubbing

use recforge_model::{Group, RecordDraft};

/// Remove each `(group, key)` from every record that has it
///
/// Missing keys are ignored. Returns the number of removals.
pub fn delete_keys(records: &mut [RecordDraft], targets: &[(Group, String)]) -> usize {
    let mut removed = 0;
    for record in records.iter_mut() {
        for (group, key) in targets {
            if record.remove(*group, key).is_some() {
                removed += 1;
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_contrast(value: Option<&str>) -> RecordDraft {
        let mut draft = RecordDraft::new();
        draft.tags.insert("model".into(), json!("m1"));
        if let Some(v) = value {
            draft.tags.insert("contrast".into(), json!(v));
        }
        draft
    }

    #[test]
    fn removes_key_from_every_record_that_has_it() {
        let mut records = vec![with_contrast(Some("a")), with_contrast(None), with_contrast(Some("b"))];
        let removed = delete_keys(&mut records, &[(Group::Tags, "contrast".into())]);
        assert_eq!(removed, 2);
        assert!(records.iter().all(|r| !r.tags.contains_key("contrast")));
        assert!(records.iter().all(|r| r.tags["model"] == json!("m1")));
    }

    #[test]
    fn missing_key_is_a_noop() {
        let mut records = vec![with_contrast(None)];
        let before = records.clone();
        assert_eq!(delete_keys(&mut records, &[(Group::Images, "mask".into())]), 0);
        assert_eq!(records, before);
    }

    #[test]
    fn only_the_named_group_is_touched() {
        let mut record = with_contrast(Some("a"));
        record.vals.insert("contrast".into(), json!(1));
        let mut records = vec![record];
        delete_keys(&mut records, &[(Group::Vals, "contrast".into())]);
        assert!(records[0].tags.contains_key("contrast"));
        assert!(!records[0].vals.contains_key("contrast"));
    }
}
