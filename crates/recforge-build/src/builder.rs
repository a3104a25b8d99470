//! Record builder
//!
//! [`RecordBuilder`] runs one construction call end to end:
//!
//! ```text
//! FieldSet → entries → prune undefined → BroadcastProfile → align
//!          → assemble → composite expansion → key deletion → validate
//! ```

use crate::assemble::{assemble, AlignedField};
use crate::broadcast::BroadcastProfile;
use crate::composite::CompositeRule;
use crate::delete::delete_keys;
use crate::error::{BuildError, BuildResult};
use crate::fields::{collect_entries, prune_undefined, FieldSet};
use crate::spec::BuildSpec;
use recforge_model::{Group, Partition, RecordValidator, ResultRecord, ResultSchema};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Ordered output of one construction call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub records: Vec<ResultRecord>,
}

impl RecordSet {
    /// `vals` of the first record, if any
    #[must_use]
    pub fn vals(&self) -> Option<&Partition> {
        self.records.first().map(|r| &r.vals)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRecord> {
        self.records.iter()
    }
}

impl IntoIterator for RecordSet {
    type Item = ResultRecord;
    type IntoIter = std::vec::IntoIter<ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a ResultRecord;
    type IntoIter = std::slice::Iter<'a, ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Builds result records for one declared construction step
#[derive(Clone)]
pub struct RecordBuilder {
    spec: BuildSpec,
    composite: CompositeRule,
    validator: Arc<dyn RecordValidator>,
    delete_targets: Vec<(Group, String)>,
}

impl RecordBuilder {
    /// Create builder validating against [`ResultSchema`]
    ///
    /// The schema's vocabulary is the default one plus `spec.entities`.
    ///
    /// # Errors
    /// Returns error if the spec is inconsistent or the schema fails to build
    pub fn new(spec: BuildSpec) -> BuildResult<Self> {
        let schema =
            ResultSchema::with_vocabulary(spec.vocabulary()).map_err(BuildError::SchemaSetup)?;
        Self::with_validator(spec, Arc::new(schema))
    }

    /// Create builder with a custom validator
    ///
    /// # Errors
    /// Returns error if the spec is inconsistent
    pub fn with_validator(spec: BuildSpec, validator: Arc<dyn RecordValidator>) -> BuildResult<Self> {
        spec.validate()?;

        let composite = spec
            .composite_routes
            .iter()
            .fold(CompositeRule::new(), |rule, (attribute, tag)| {
                rule.with_route(attribute.clone(), tag.clone())
            });

        let delete_targets = spec
            .keyed_fields()
            .filter(|(_, key)| spec.delete.iter().any(|d| d == *key))
            .map(|(group, key)| (group, key.to_string()))
            .collect();

        Ok(Self {
            spec,
            composite,
            validator,
            delete_targets,
        })
    }

    #[inline]
    #[must_use]
    pub fn spec(&self) -> &BuildSpec {
        &self.spec
    }

    /// Run one construction call
    ///
    /// Either every record validates and the whole sequence is returned, or
    /// the call fails; there are no partial results.
    ///
    /// # Errors
    /// Returns error on undeclared inputs, broadcast length mismatches,
    /// malformed whole-mapping values, or schema rejection
    pub fn build(&self, fields: &FieldSet) -> BuildResult<RecordSet> {
        let mut entries = collect_entries(&self.spec, fields)?;
        if entries.is_empty() {
            tracing::debug!("no defined inputs, nothing to build");
            return Ok(RecordSet::default());
        }

        let pruned = prune_undefined(&mut entries);
        if pruned > 0 {
            tracing::debug!(pruned, "dropped undefined positions");
            let exhausted = entries
                .iter()
                .filter(|e| e.value.is_seq())
                .all(|e| e.value.is_empty());
            if exhausted {
                tracing::debug!("every position was undefined, nothing to build");
                return Ok(RecordSet::default());
            }
        }

        let is_exempt = |key: Option<&str>| key.is_some_and(|k| self.spec.is_nobroadcast(k));
        let profile = BroadcastProfile::resolve(&entries, |e| is_exempt(e.key.as_deref()));
        tracing::debug!(
            maxlen = profile.maxlen,
            nbroadcast = ?profile.nbroadcast,
            fields = entries.len(),
            "resolved broadcast profile"
        );

        let columns = entries
            .into_iter()
            .map(|entry| -> BuildResult<AlignedField> {
                let exempt = is_exempt(entry.key.as_deref());
                let name = entry.name().to_string();
                let values = profile.align(&name, entry.value, exempt)?;
                Ok(AlignedField {
                    group: entry.group,
                    key: entry.key,
                    values,
                })
            })
            .collect::<BuildResult<Vec<_>>>()?;

        let drafts = assemble(&columns, profile.maxlen, self.validator.vocabulary())?;
        let mut drafts = self.composite.expand(drafts);
        delete_keys(&mut drafts, &self.delete_targets);

        let records = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                self.validator
                    .load(draft)
                    .map_err(|source| BuildError::Schema { index, source })
            })
            .collect::<BuildResult<Vec<_>>>()?;

        tracing::debug!(records = records.len(), "built result records");
        Ok(RecordSet { records })
    }
}

impl fmt::Debug for RecordBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordBuilder")
            .field("spec", &self.spec)
            .field("composite", &self.composite)
            .field("delete_targets", &self.delete_targets)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recforge_model::{Datum, EntityVocabulary, RecordDraft, SchemaError};
    use serde_json::json;

    #[test]
    fn empty_inputs_build_nothing() {
        let builder = RecordBuilder::new(BuildSpec::new().with_tags(["sub"])).unwrap();
        let out = builder.build(&FieldSet::new()).unwrap();
        assert!(out.is_empty());
        assert!(out.vals().is_none());
    }

    #[test]
    fn all_undefined_builds_nothing() {
        let builder = RecordBuilder::new(BuildSpec::new().with_tags(["sub"])).unwrap();
        let fields = FieldSet::new().with("sub", Datum::Undefined);
        assert!(builder.build(&fields).unwrap().is_empty());
    }

    #[test]
    fn vals_exposes_first_record() {
        let builder = RecordBuilder::new(BuildSpec::new().with_vals(["dof"])).unwrap();
        let fields = FieldSet::new().with("dof", json!([10, 20]));
        let out = builder.build(&fields).unwrap();
        assert_eq!(out.vals().unwrap()["dof"], json!(10));
    }

    struct RejectAll(EntityVocabulary);

    impl RecordValidator for RejectAll {
        fn vocabulary(&self) -> &EntityVocabulary {
            &self.0
        }

        fn load(&self, _draft: RecordDraft) -> Result<ResultRecord, SchemaError> {
            Err(SchemaError::Invalid {
                messages: vec!["rejected".to_string()],
            })
        }
    }

    #[test]
    fn validation_failure_fails_the_call() {
        let builder = RecordBuilder::with_validator(
            BuildSpec::new().with_tags(["sub"]),
            Arc::new(RejectAll(EntityVocabulary::default())),
        )
        .unwrap();
        let fields = FieldSet::new().with("sub", json!(["01", "02"]));
        let err = builder.build(&fields).unwrap_err();
        assert!(matches!(err, BuildError::Schema { index: 0, .. }));
    }

    #[test]
    fn invalid_spec_is_rejected_up_front() {
        let err = RecordBuilder::new(BuildSpec::new().with_delete(["contrast"])).unwrap_err();
        assert!(matches!(err, BuildError::Spec(_)));
    }

    #[test]
    fn extra_entities_reach_the_schema() {
        let spec = BuildSpec::new().with_entities(["roi"]);
        let builder = RecordBuilder::new(spec).unwrap();
        let fields = FieldSet::new().with("tags", json!({"roi": "amygdala", "sub": "01"}));
        let out = builder.build(&fields).unwrap();
        assert_eq!(out.records[0].tag("roi"), Some("amygdala"));
    }
}
