//! Error types shared across CineVibe services
//!
//! Every service-level failure is expressed as a [`CineVibeError`]. Provider
//! crates convert their own error enums into this type at the service boundary
//! so tool handlers only ever deal with one taxonomy.

use thiserror::Error;

/// Unified error type for CineVibe operations
#[derive(Debug, Error)]
pub enum CineVibeError {
    /// Invalid or inconsistent configuration detected at startup
    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        key: Option<String>,
    },

    /// Caller supplied arguments that cannot be processed
    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
        field: Option<String>,
    },

    /// The requested title (or reference) does not exist upstream
    #[error("Not found: {message}")]
    NotFoundError { message: String },

    /// An upstream provider could not be reached or answered with a failure
    #[error("Upstream provider {provider} failed: {message}")]
    UpstreamError { provider: String, message: String },

    /// Anything else
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CineVibeError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: None,
        }
    }

    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFoundError {
            message: message.into(),
        }
    }

    pub fn upstream(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamError {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Short machine-readable error code, surfaced in tool results
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigurationError { .. } => "configuration_error",
            Self::ValidationError { .. } => "validation_error",
            Self::NotFoundError { .. } => "not_found",
            Self::UpstreamError { .. } => "upstream_unavailable",
            Self::InternalError { .. } => "internal_error",
        }
    }

    /// Whether the caller sent something wrong (as opposed to an upstream or server fault)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }
}

impl From<serde_json::Error> for CineVibeError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("Serialization failed: {}", err))
    }
}
