//! CineVibe provider ingestion
//!
//! This crate talks to the upstream content providers (TMDb, OMDb, Trakt),
//! normalizes their rating shapes and assembles enriched [`Title`] records.
//!
//! [`Title`]: cinevibe_core::Title

pub mod aggregator;
pub mod enrichment;
pub mod genre_mapping;
pub mod normalizer;
pub mod sentiment;

// Re-export main types
pub use aggregator::{
    build_http_client, DiscoverQuery, OmdbClient, ProviderClient, RawPayload, TMDbClient,
    TraktClient, TrendingMediaType, TrendingWindow,
};
pub use enrichment::EnrichmentOrchestrator;
pub use genre_mapping::{CanonicalGenre, GenreMapper};
pub use normalizer::{normalize, RatingScale};

use cinevibe_core::CineVibeError;

/// Outcome of a single failed provider call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Transport failure or non-success HTTP status
    #[error("{provider} unreachable: {message}")]
    Unreachable {
        provider: &'static str,
        message: String,
    },

    /// The provider explicitly reported that it has no such record
    #[error("{provider} has no match: {message}")]
    NotFound {
        provider: &'static str,
        message: String,
    },

    /// The payload lacked a field needed to identify the record
    #[error("{provider} returned a malformed payload: {message}")]
    Malformed {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub fn unreachable(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Unreachable {
            provider,
            message: message.into(),
        }
    }

    pub fn not_found(provider: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            provider,
            message: message.into(),
        }
    }

    pub fn malformed(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            provider,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn provider(&self) -> &'static str {
        match self {
            Self::Unreachable { provider, .. }
            | Self::NotFound { provider, .. }
            | Self::Malformed { provider, .. } => provider,
        }
    }
}

impl From<ProviderError> for CineVibeError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound { provider, message } => {
                CineVibeError::not_found(format!("{}: {}", provider, message))
            }
            ProviderError::Unreachable { provider, message }
            | ProviderError::Malformed { provider, message } => {
                CineVibeError::upstream(provider, message)
            }
        }
    }
}

/// Result type for provider calls
pub type Result<T> = std::result::Result<T, ProviderError>;
