//! Error types for record construction
//!
//! - [`SpecError`]: build spec loading and declaration checks
//! - [`BuildError`]: failures of a single construction call

use recforge_model::{Group, SchemaError};
use std::path::PathBuf;

/// Errors in a build spec
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// Same field name declared twice
    #[error("field '{name}' declared in both {first} and {second}")]
    DuplicateField {
        name: String,
        first: String,
        second: String,
    },

    /// Whole-mapping group listed more than once
    #[error("mapping group '{0}' listed more than once")]
    DuplicateMapping(Group),

    /// Key marked for special handling but never declared
    #[error("{role} key '{key}' is not declared in any group")]
    UndeclaredKey { role: &'static str, key: String },

    /// Composite route targets a tag outside the vocabulary
    #[error("composite route '{attribute}' targets unknown tag '{tag}'")]
    UnknownRouteTag { attribute: String, tag: String },

    /// Spec file extension not recognized
    #[error("unsupported spec format for {}: expected .toml, .yaml, .yml or .json", .0.display())]
    UnsupportedFormat(PathBuf),

    /// IO error reading spec file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Spec document failed to parse
    #[error("failed to parse spec: {0}")]
    Parse(String),
}

impl SpecError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors during a construction call
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Field cannot be broadcast to the target length
    #[error("can't broadcast field '{field}': lists of lengths {len} and {maxlen}")]
    LengthMismatch {
        field: String,
        len: usize,
        maxlen: usize,
    },

    /// Input names a field the spec does not declare
    #[error("field '{0}' is not declared in the build spec")]
    UndeclaredField(String),

    /// Whole-mapping field carried something other than a mapping
    #[error("whole-mapping field '{group}' at position {position} is not a mapping")]
    NotAMapping { group: Group, position: usize },

    /// A record was rejected by the schema
    #[error("record {index} failed schema validation: {source}")]
    Schema {
        index: usize,
        #[source]
        source: SchemaError,
    },

    /// Schema could not be set up
    #[error("schema setup failed: {0}")]
    SchemaSetup(#[source] SchemaError),

    /// Build spec is invalid
    #[error("invalid build spec: {0}")]
    Spec(#[from] SpecError),
}

impl BuildError {
    /// Create length mismatch error
    pub fn length_mismatch(field: impl Into<String>, len: usize, maxlen: usize) -> Self {
        Self::LengthMismatch {
            field: field.into(),
            len,
            maxlen,
        }
    }
}

/// Result type alias for construction
pub type BuildResult<T> = Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_reports_both_lengths() {
        let err = BuildError::length_mismatch("effect", 3, 5);
        assert_eq!(
            err.to_string(),
            "can't broadcast field 'effect': lists of lengths 3 and 5"
        );
    }

    #[test]
    fn spec_errors_convert() {
        let err: BuildError = SpecError::DuplicateMapping(Group::Tags).into();
        assert!(matches!(err, BuildError::Spec(_)));
        assert!(err.to_string().contains("listed more than once"));
    }
}
