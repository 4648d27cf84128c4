//! # CineVibe Core
//!
//! Shared building blocks for the CineVibe services.
//!
//! ## Modules
//!
//! - `models`: Titles, rating sets, listings and community data
//! - `error`: Error types and handling
//! - `validation`: Validation of tool arguments
//! - `config`: Configuration loading and validation
//! - `observability`: Structured logging to stderr

pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod validation;

// Re-export commonly used types
pub use config::{load_dotenv, ConfigLoader, ProviderConfig, ServerConfig};
pub use error::CineVibeError;
pub use models::{
    CastMember, CommunityData, CommunityPick, CommunityStats, CommunityTrendingEntry, MediaType,
    RatingSet, RelatedTitle, Sentiment, Title, TitleRef, TitleSummary,
};
pub use observability::{init_logging, LogConfig, LogFormat, ObservabilityError};

/// Result type alias for CineVibe operations
pub type Result<T> = std::result::Result<T, CineVibeError>;
