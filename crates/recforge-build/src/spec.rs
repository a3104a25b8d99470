//! Build spec
//!
//! Declares, for one construction step, which input names feed which record
//! partition. Loadable from TOML, YAML or JSON:
//!
//! ```toml
//! tags = ["model", "contrast"]
//! images = ["effect", "variance"]
//! delete = ["contrast"]
//! ```

use crate::error::SpecError;
use indexmap::IndexMap;
use recforge_model::{EntityVocabulary, Group};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Field declarations for one construction step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSpec {
    /// Groups whose same-named input is a mapping merged wholesale
    pub mappings: Vec<Group>,
    pub tags: Vec<String>,
    pub vals: Vec<String>,
    pub images: Vec<String>,
    pub reports: Vec<String>,
    pub metadata: Vec<String>,
    /// Keyed fields excluded from broadcasting and flattening
    pub nobroadcast: Vec<String>,
    /// Keyed fields removed from their group after expansion
    pub delete: Vec<String>,
    /// Tag keys recognized in addition to the default vocabulary
    pub entities: Vec<String>,
    /// Composite attribute to tag key routes, in addition to `ortho = "stat"`
    pub composite_routes: IndexMap<String, String>,
}

impl Default for BuildSpec {
    fn default() -> Self {
        Self {
            mappings: vec![Group::Tags, Group::Metadata, Group::Vals],
            tags: Vec::new(),
            vals: Vec::new(),
            images: Vec::new(),
            reports: Vec::new(),
            metadata: Vec::new(),
            nobroadcast: Vec::new(),
            delete: Vec::new(),
            entities: Vec::new(),
            composite_routes: IndexMap::new(),
        }
    }
}

impl BuildSpec {
    /// Create spec with default mapping groups and no keyed fields
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mappings(mut self, groups: impl IntoIterator<Item = Group>) -> Self {
        self.mappings = groups.into_iter().collect();
        self
    }

    /// Add keyed fields to a group
    #[must_use]
    pub fn with_keys<I, S>(mut self, group: Group, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys_mut(group).extend(keys.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_keys(Group::Tags, keys)
    }

    #[must_use]
    pub fn with_vals<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_keys(Group::Vals, keys)
    }

    #[must_use]
    pub fn with_images<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_keys(Group::Images, keys)
    }

    #[must_use]
    pub fn with_reports<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_keys(Group::Reports, keys)
    }

    #[must_use]
    pub fn with_metadata<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_keys(Group::Metadata, keys)
    }

    #[must_use]
    pub fn with_nobroadcast<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nobroadcast.extend(keys.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_delete<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.delete.extend(keys.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_entities<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_composite_route(
        mut self,
        attribute: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        self.composite_routes.insert(attribute.into(), tag.into());
        self
    }

    /// Keyed fields declared for a group
    #[must_use]
    pub fn keys(&self, group: Group) -> &[String] {
        match group {
            Group::Tags => &self.tags,
            Group::Vals => &self.vals,
            Group::Images => &self.images,
            Group::Reports => &self.reports,
            Group::Metadata => &self.metadata,
        }
    }

    fn keys_mut(&mut self, group: Group) -> &mut Vec<String> {
        match group {
            Group::Tags => &mut self.tags,
            Group::Vals => &mut self.vals,
            Group::Images => &mut self.images,
            Group::Reports => &mut self.reports,
            Group::Metadata => &mut self.metadata,
        }
    }

    /// Keyed-field groups in entry order
    pub(crate) const KEYED_ORDER: [Group; 5] = [
        Group::Tags,
        Group::Vals,
        Group::Images,
        Group::Reports,
        Group::Metadata,
    ];

    /// Every keyed field as `(group, name)`, in entry order
    pub fn keyed_fields(&self) -> impl Iterator<Item = (Group, &str)> {
        Self::KEYED_ORDER
            .into_iter()
            .flat_map(move |group| self.keys(group).iter().map(move |k| (group, k.as_str())))
    }

    /// Group a keyed field is declared in
    #[must_use]
    pub fn group_of(&self, key: &str) -> Option<Group> {
        self.keyed_fields()
            .find(|(_, name)| *name == key)
            .map(|(group, _)| group)
    }

    #[inline]
    #[must_use]
    pub fn is_nobroadcast(&self, key: &str) -> bool {
        self.nobroadcast.iter().any(|k| k == key)
    }

    /// Default vocabulary plus this spec's extra entities
    #[must_use]
    pub fn vocabulary(&self) -> EntityVocabulary {
        let mut vocabulary = EntityVocabulary::default();
        vocabulary.extend(self.entities.iter().cloned());
        vocabulary
    }

    /// Check the declarations are consistent
    ///
    /// # Errors
    /// Returns error on duplicate names, or `nobroadcast`/`delete` keys that
    /// are never declared, or composite routes into unknown tags
    pub fn validate(&self) -> Result<(), SpecError> {
        let mut seen: HashMap<&str, String> = HashMap::new();
        for (i, group) in self.mappings.iter().enumerate() {
            if self.mappings[..i].contains(group) {
                return Err(SpecError::DuplicateMapping(*group));
            }
            seen.insert(group.as_str(), "mappings".to_string());
        }
        for (group, name) in self.keyed_fields() {
            if let Some(first) = seen.get(name) {
                return Err(SpecError::DuplicateField {
                    name: name.to_string(),
                    first: first.clone(),
                    second: group.to_string(),
                });
            }
            seen.insert(name, group.to_string());
        }

        for (role, keys) in [("nobroadcast", &self.nobroadcast), ("delete", &self.delete)] {
            if let Some(key) = keys.iter().find(|k| self.group_of(k).is_none()) {
                return Err(SpecError::UndeclaredKey {
                    role,
                    key: key.clone(),
                });
            }
        }

        let vocabulary = self.vocabulary();
        for (attribute, tag) in &self.composite_routes {
            if !vocabulary.contains(tag) {
                return Err(SpecError::UnknownRouteTag {
                    attribute: attribute.clone(),
                    tag: tag.clone(),
                });
            }
        }
        Ok(())
    }

    /// Parse TOML document
    ///
    /// # Errors
    /// Returns error if the document is not a valid spec
    pub fn from_toml_str(s: &str) -> Result<Self, SpecError> {
        toml::from_str(s).map_err(|e| SpecError::Parse(e.to_string()))
    }

    /// Parse YAML document
    ///
    /// # Errors
    /// Returns error if the document is not a valid spec
    pub fn from_yaml_str(s: &str) -> Result<Self, SpecError> {
        serde_yaml::from_str(s).map_err(|e| SpecError::Parse(e.to_string()))
    }

    /// Parse JSON document
    ///
    /// # Errors
    /// Returns error if the document is not a valid spec
    pub fn from_json_str(s: &str) -> Result<Self, SpecError> {
        serde_json::from_str(s).map_err(|e| SpecError::Parse(e.to_string()))
    }

    /// Load and validate spec file, format chosen by extension
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed or validated
    pub fn from_path(path: &Path) -> Result<Self, SpecError> {
        let parse: fn(&str) -> Result<Self, SpecError> = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str,
            Some("yaml" | "yml") => Self::from_yaml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(SpecError::UnsupportedFormat(path.to_path_buf())),
        };
        let text = std::fs::read_to_string(path).map_err(|e| SpecError::io_error(path, e))?;
        let spec = parse(&text)?;
        spec.validate()?;
        Ok(spec)
    }
}
