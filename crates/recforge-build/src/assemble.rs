//! Record assembly
//!
//! Turns aligned columns (one value per record for every field) into
//! [`RecordDraft`]s.

use crate::error::{BuildError, BuildResult};
use recforge_model::{Datum, EntityVocabulary, Group, RecordDraft};
use serde_json::Value;

/// A field stretched to one value per record
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedField {
    pub group: Group,
    /// `None` for whole-mapping fields
    pub key: Option<String>,
    pub values: Vec<Datum>,
}

/// Build one draft per position
///
/// Whole-mapping fields are merged first, then keyed fields are written on
/// top (null values are skipped). Tag keys outside `vocabulary` are dropped.
///
/// # Errors
/// Returns error if a whole-mapping value is not a mapping
pub fn assemble(
    columns: &[AlignedField],
    maxlen: usize,
    vocabulary: &EntityVocabulary,
) -> BuildResult<Vec<RecordDraft>> {
    let (mappings, keyed): (Vec<_>, Vec<_>) = columns.iter().partition(|c| c.key.is_none());

    let mut drafts = Vec::with_capacity(maxlen);
    for position in 0..maxlen {
        let mut draft = RecordDraft::new();

        for column in &mappings {
            match &column.values[position] {
                Datum::Value(Value::Object(map)) => {
                    let partition = draft.group_mut(column.group);
                    for (k, v) in map {
                        partition.insert(k.clone(), v.clone());
                    }
                }
                Datum::Value(Value::Null) | Datum::Undefined => {}
                _ => {
                    return Err(BuildError::NotAMapping {
                        group: column.group,
                        position,
                    })
                }
            }
        }

        for column in &keyed {
            let value = &column.values[position];
            if value.is_null() || value.is_undefined() {
                continue;
            }
            if let Some(key) = &column.key {
                draft
                    .group_mut(column.group)
                    .insert(key.clone(), value.clone().into_value());
            }
        }

        let dropped = vocabulary.retain_known(&mut draft.tags);
        if dropped > 0 {
            tracing::debug!(position, dropped, "dropped tags outside entity vocabulary");
        }
        drafts.push(draft);
    }
    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn column(group: Group, key: Option<&str>, values: Vec<Value>) -> AlignedField {
        AlignedField {
            group,
            key: key.map(str::to_string),
            values: values.into_iter().map(Datum::from).collect(),
        }
    }

    #[test]
    fn one_draft_per_position() {
        let columns = [
            column(Group::Tags, Some("sub"), vec![json!("01"), json!("02")]),
            column(Group::Vals, Some("dof"), vec![json!(10), json!(10)]),
        ];
        let drafts = assemble(&columns, 2, &EntityVocabulary::default()).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[1].tags["sub"], json!("02"));
        assert_eq!(drafts[0].vals["dof"], json!(10));
    }

    #[test]
    fn keyed_entries_override_mappings() {
        let columns = [
            column(Group::Tags, None, vec![json!({"sub": "01", "task": "rest"})]),
            column(Group::Tags, Some("task"), vec![json!("faces")]),
        ];
        let drafts = assemble(&columns, 1, &EntityVocabulary::default()).unwrap();
        assert_eq!(drafts[0].tags["task"], json!("faces"));
        assert_eq!(drafts[0].tags["sub"], json!("01"));
    }

    #[test]
    fn null_keyed_values_are_not_written() {
        let columns = [
            column(Group::Tags, None, vec![json!({"task": "rest"})]),
            column(Group::Tags, Some("task"), vec![Value::Null]),
            column(Group::Images, Some("effect"), vec![Value::Null]),
        ];
        let drafts = assemble(&columns, 1, &EntityVocabulary::default()).unwrap();
        assert_eq!(drafts[0].tags["task"], json!("rest"));
        assert!(drafts[0].images.is_empty());
    }

    #[test]
    fn unknown_tags_are_dropped() {
        let columns = [column(
            Group::Tags,
            None,
            vec![json!({"sub": "01", "hemisphere": "L"})],
        )];
        let drafts = assemble(&columns, 1, &EntityVocabulary::default()).unwrap();
        assert!(drafts[0].tags.contains_key("sub"));
        assert!(!drafts[0].tags.contains_key("hemisphere"));
    }

    #[test]
    fn non_mapping_whole_value_fails() {
        let columns = [column(Group::Metadata, None, vec![json!("oops")])];
        let err = assemble(&columns, 1, &EntityVocabulary::default()).unwrap_err();
        assert!(matches!(
            err,
            BuildError::NotAMapping {
                group: Group::Metadata,
                position: 0
            }
        ));
    }

    #[test]
    fn reports_only_appear_when_written() {
        let columns = [
            column(Group::Reports, Some("tsnr"), vec![json!("/r/a.svg"), Value::Null]),
        ];
        let drafts = assemble(&columns, 2, &EntityVocabulary::default()).unwrap();
        assert!(drafts[0].reports.is_some());
        assert!(drafts[1].reports.is_none());
    }
}
