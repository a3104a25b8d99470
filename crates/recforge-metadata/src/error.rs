//! Error types for metadata resolution

/// Errors raised by metadata providers
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// Provider failed while looking up a key
    #[error("provider '{provider}' failed on '{key}': {message}")]
    Provider {
        provider: String,
        key: String,
        message: String,
    },

    /// Provider produced a value of the wrong shape
    #[error("invalid value for '{key}': {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl MetadataError {
    /// Create provider failure
    pub fn provider(
        provider: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for metadata operations
pub type MetadataResult<T> = Result<T, MetadataError>;
