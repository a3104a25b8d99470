//! Error types for the record model
//!
//! - [`ModelError`]: malformed names and declarations
//! - [`SchemaError`]: records rejected by a [`crate::RecordValidator`]

use crate::group::Group;

/// Errors in model-level declarations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Group name is not one of the known partitions
    #[error("unknown record group: '{0}'")]
    UnknownGroup(String),
}

/// Errors raised while validating a record against the schema
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema document itself failed to compile
    #[error("schema compilation failed: {0}")]
    Compile(String),

    /// A value could not be normalized into the partition's shape
    #[error("cannot normalize {group}.{key}: {reason}")]
    Normalize {
        group: Group,
        key: String,
        reason: String,
    },

    /// Record violates the schema
    #[error("record failed validation: {}", .messages.join("; "))]
    Invalid { messages: Vec<String> },

    /// Validated record could not be decoded into its typed form
    #[error("record decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SchemaError {
    /// Create normalization error for a key
    pub fn normalize(group: Group, key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Normalize {
            group,
            key: key.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_lists_every_message() {
        let err = SchemaError::Invalid {
            messages: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "record failed validation: a; b");
    }

    #[test]
    fn normalize_names_group_and_key() {
        let err = SchemaError::normalize(Group::Images, "effect", "expected a path string");
        assert_eq!(
            err.to_string(),
            "cannot normalize images.effect: expected a path string"
        );
    }
}
