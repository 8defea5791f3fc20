//! Error types for Promptgate

/// Result type alias using Promptgate's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Promptgate operations
///
/// Partial detector failure degrades accuracy, never correctness or
/// availability: only `InvalidConfig` and `MalformedRule` abort a
/// validation call. `ClassifierUnavailable` and `Timeout` are consumed
/// inside the pipeline and surface to callers as warnings.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An external classifier could not be reached or its response could
    /// not be parsed. Recovered locally; contributes no findings.
    #[error("classifier '{name}' unavailable: {reason}")]
    ClassifierUnavailable { name: String, reason: String },

    /// Malformed or missing security level. Fatal, rejected before any
    /// detection work begins.
    #[error("invalid security level config: {0}")]
    InvalidConfig(String),

    /// A structural or entropy rule failed to compile. Fatal at startup,
    /// never at request time.
    #[error("malformed detector rule: {0}")]
    MalformedRule(String),

    /// A classifier did not respond within its deadline
    #[error("classifier '{0}' timed out")]
    Timeout(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new classifier-unavailable error
    pub fn classifier_unavailable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ClassifierUnavailable {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid-config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new malformed-rule error
    pub fn malformed_rule(msg: impl Into<String>) -> Self {
        Self::MalformedRule(msg.into())
    }

    /// Whether this error is recoverable inside the pipeline
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ClassifierUnavailable { .. } | Self::Timeout(_))
    }
}
