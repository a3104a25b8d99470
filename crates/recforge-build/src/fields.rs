//! Construction inputs
//!
//! A [`FieldSet`] holds the named inputs of one construction call. Against a
//! [`BuildSpec`] it resolves into an ordered list of [`FieldEntry`] values:
//! whole-mapping fields first, then keyed fields group by group.

use crate::error::{BuildError, BuildResult};
use crate::spec::BuildSpec;
use indexmap::IndexMap;
use recforge_model::{Datum, Group};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Named inputs for one construction call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet {
    fields: IndexMap<String, Datum>,
}

impl FieldSet {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Datum>) -> &mut Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builder-style [`FieldSet::set`]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Datum>) -> Self {
        self.set(name, value);
        self
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Datum> {
        self.fields.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Datum>> FromIterator<(K, V)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// One defined input, bound to its record partition
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    pub group: Group,
    /// `None` for whole-mapping fields merged into `group`
    pub key: Option<String>,
    pub value: Datum,
}

impl FieldEntry {
    /// Name the entry was supplied under
    #[must_use]
    pub fn name(&self) -> &str {
        self.key.as_deref().unwrap_or(self.group.as_str())
    }

    #[inline]
    #[must_use]
    pub fn is_mapping(&self) -> bool {
        self.key.is_none()
    }
}

/// Resolve inputs into entries, skipping undefined fields
///
/// Values are copied out of `fields`; the caller's inputs are left untouched.
///
/// # Errors
/// Returns error if `fields` names something the spec does not declare
pub fn collect_entries(spec: &BuildSpec, fields: &FieldSet) -> BuildResult<Vec<FieldEntry>> {
    if let Some(name) = fields
        .names()
        .find(|name| !is_declared(spec, name))
    {
        return Err(BuildError::UndeclaredField(name.to_string()));
    }

    let mappings = spec.mappings.iter().filter_map(|group| {
        let value = fields.get(group.as_str())?;
        Some(FieldEntry {
            group: *group,
            key: None,
            value: value.clone(),
        })
    });
    let keyed = spec.keyed_fields().filter_map(|(group, key)| {
        let value = fields.get(key)?;
        Some(FieldEntry {
            group,
            key: Some(key.to_string()),
            value: value.clone(),
        })
    });

    Ok(mappings
        .chain(keyed)
        .filter(|entry| !entry.value.is_undefined())
        .collect())
}

fn is_declared(spec: &BuildSpec, name: &str) -> bool {
    spec.mappings.iter().any(|g| g.as_str() == name) || spec.group_of(name).is_some()
}

/// Drop every sequence position that is undefined in any sequence field
///
/// Positions are aligned across fields: an undefined element at index `j`
/// of one field removes index `j` from all of them. Returns the number of
/// positions removed.
pub fn prune_undefined(entries: &mut [FieldEntry]) -> usize {
    let undefined: BTreeSet<usize> = entries
        .iter()
        .filter_map(|entry| entry.value.as_seq())
        .flat_map(|items| {
            items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.is_undefined())
                .map(|(j, _)| j)
        })
        .collect();

    if undefined.is_empty() {
        return 0;
    }

    for entry in entries.iter_mut() {
        if let Datum::Seq(items) = &mut entry.value {
            let mut j = 0;
            items.retain(|_| {
                let keep = !undefined.contains(&j);
                j += 1;
                keep
            });
        }
    }
    undefined.len()
}
