//! Record schema validation
//!
//! [`RecordValidator`] is the seam between construction and the declared
//! record schema. [`ResultSchema`] normalizes scalar tags to strings, checks
//! the draft against a compiled JSON Schema and decodes it into a
//! [`ResultRecord`].

use crate::entities::EntityVocabulary;
use crate::error::SchemaError;
use crate::group::Group;
use crate::record::{Partition, RecordDraft, ResultRecord};
use jsonschema::JSONSchema;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// Validates and normalizes records
pub trait RecordValidator: Send + Sync {
    /// Tag keys this schema recognizes
    fn vocabulary(&self) -> &EntityVocabulary;

    /// Normalize a draft into a validated record
    ///
    /// # Errors
    /// Returns error if the draft does not satisfy the schema
    fn load(&self, draft: RecordDraft) -> Result<ResultRecord, SchemaError>;
}

/// Default record schema
#[derive(Clone)]
pub struct ResultSchema {
    vocabulary: EntityVocabulary,
    compiled: Arc<JSONSchema>,
}

impl ResultSchema {
    /// Create schema over the default entity vocabulary
    ///
    /// # Errors
    /// Returns error if the schema document fails to compile
    pub fn new() -> Result<Self, SchemaError> {
        Self::with_vocabulary(EntityVocabulary::default())
    }

    /// Create schema over a custom entity vocabulary
    ///
    /// # Errors
    /// Returns error if the schema document fails to compile
    pub fn with_vocabulary(vocabulary: EntityVocabulary) -> Result<Self, SchemaError> {
        let document = Self::document(&vocabulary);
        let compiled =
            JSONSchema::compile(&document).map_err(|e| SchemaError::Compile(e.to_string()))?;
        Ok(Self {
            vocabulary,
            compiled: Arc::new(compiled),
        })
    }

    /// JSON Schema document describing a record
    #[must_use]
    pub fn document(vocabulary: &EntityVocabulary) -> Value {
        let entity_names: Vec<&str> = vocabulary.iter().collect();
        let paths = json!({
            "type": "object",
            "additionalProperties": { "type": "string" }
        });
        json!({
            "type": "object",
            "required": ["tags", "metadata", "images", "vals"],
            "additionalProperties": false,
            "properties": {
                "tags": {
                    "type": "object",
                    "propertyNames": { "enum": entity_names },
                    "additionalProperties": { "type": "string" }
                },
                "metadata": { "type": "object" },
                "images": paths.clone(),
                "vals": { "type": "object" },
                "reports": paths
            }
        })
    }

    /// Convert scalar tag values to their string form
    fn normalize_tags(tags: &mut Partition) -> Result<(), SchemaError> {
        for (key, value) in tags.iter_mut() {
            let text = match value {
                Value::String(_) => continue,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(SchemaError::normalize(
                        Group::Tags,
                        key.clone(),
                        format!("expected a scalar, got {other}"),
                    ))
                }
            };
            *value = Value::String(text);
        }
        Ok(())
    }
}

impl RecordValidator for ResultSchema {
    fn vocabulary(&self) -> &EntityVocabulary {
        &self.vocabulary
    }

    fn load(&self, mut draft: RecordDraft) -> Result<ResultRecord, SchemaError> {
        Self::normalize_tags(&mut draft.tags)?;

        let instance = serde_json::to_value(&draft)?;
        if let Err(errors) = self.compiled.validate(&instance) {
            let messages = errors
                .map(|e| format!("{}: {}", e.instance_path, e))
                .collect();
            return Err(SchemaError::Invalid { messages });
        }

        Ok(serde_json::from_value(instance)?)
    }
}

impl fmt::Debug for ResultSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSchema")
            .field("vocabulary", &self.vocabulary)
            .finish_non_exhaustive()
    }
}
