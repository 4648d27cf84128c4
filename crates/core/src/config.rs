//! Shared configuration loader for CineVibe services
//!
//! Configuration is read once at process start, validated, and then handed to
//! every component behind an `Arc`. Provider credentials use the provider's
//! conventional variable names (`TMDB_API_KEY`, `OMDB_API_KEY`,
//! `TRAKT_CLIENT_ID`); every other setting uses the `CINEVIBE_` prefix.
//!
//! # Features
//!
//! - Environment variable parsing with typed values
//! - .env file support via dotenvy
//! - Validation with clear error messages naming the offending key
//! - Override hierarchy: defaults < .env < environment
//!
//! # Example
//!
//! ```no_run
//! use cinevibe_core::config::{load_dotenv, ConfigLoader, ProviderConfig};
//!
//! # fn example() -> Result<(), cinevibe_core::CineVibeError> {
//! load_dotenv();
//!
//! let providers = ProviderConfig::from_env()?;
//! providers.validate()?;
//! # Ok(())
//! # }
//! ```

use crate::error::CineVibeError;
use crate::observability::LogFormat;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_OMDB_BASE_URL: &str = "https://www.omdbapi.com";
pub const DEFAULT_TRAKT_BASE_URL: &str = "https://api.trakt.tv";

/// Configuration loader trait
///
/// Provides standardized methods for loading and validating configuration from
/// environment variables.
pub trait ConfigLoader: Sized {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if a required variable is missing or a
    /// value cannot be parsed.
    fn from_env() -> Result<Self, CineVibeError> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    fn from_source<F>(lookup: F) -> Result<Self, CineVibeError>
    where
        F: Fn(&str) -> Option<String>;

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if any validation check fails.
    fn validate(&self) -> Result<(), CineVibeError>;
}

/// Upstream provider configuration
///
/// # Environment Variables
///
/// - `TMDB_API_KEY` (required): TMDb v3 API key
/// - `OMDB_API_KEY` (required): OMDb API key
/// - `TRAKT_CLIENT_ID` (required): Trakt application client id
/// - `TRAKT_CLIENT_SECRET` (optional): Trakt application client secret
/// - `CINEVIBE_TMDB_BASE_URL`, `CINEVIBE_OMDB_BASE_URL`, `CINEVIBE_TRAKT_BASE_URL` (optional)
/// - `CINEVIBE_REQUEST_TIMEOUT` (optional): per-call timeout in seconds (default: 10)
/// - `CINEVIBE_MAX_DISCOVER_PAGES` (optional): discovery pages scanned per request (default: 2)
#[derive(Clone)]
pub struct ProviderConfig {
    pub tmdb_api_key: String,
    pub omdb_api_key: String,
    pub trakt_client_id: String,
    pub trakt_client_secret: Option<String>,
    pub tmdb_base_url: String,
    pub tmdb_image_base_url: String,
    pub omdb_base_url: String,
    pub trakt_base_url: String,
    pub request_timeout: Duration,
    pub max_discover_pages: u32,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("tmdb_api_key", &"<redacted>")
            .field("omdb_api_key", &"<redacted>")
            .field("trakt_client_id", &"<redacted>")
            .field("tmdb_base_url", &self.tmdb_base_url)
            .field("omdb_base_url", &self.omdb_base_url)
            .field("trakt_base_url", &self.trakt_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("max_discover_pages", &self.max_discover_pages)
            .finish_non_exhaustive()
    }
}

impl ProviderConfig {
    /// Build a configuration with the given credentials and default endpoints
    pub fn with_credentials(
        tmdb_api_key: impl Into<String>,
        omdb_api_key: impl Into<String>,
        trakt_client_id: impl Into<String>,
    ) -> Self {
        Self {
            tmdb_api_key: tmdb_api_key.into(),
            omdb_api_key: omdb_api_key.into(),
            trakt_client_id: trakt_client_id.into(),
            trakt_client_secret: None,
            tmdb_base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            tmdb_image_base_url: DEFAULT_TMDB_IMAGE_BASE_URL.to_string(),
            omdb_base_url: DEFAULT_OMDB_BASE_URL.to_string(),
            trakt_base_url: DEFAULT_TRAKT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            max_discover_pages: 2,
        }
    }
}

impl ConfigLoader for ProviderConfig {
    fn from_source<F>(lookup: F) -> Result<Self, CineVibeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| CineVibeError::config(format!("{} must be set", key), key))
        };

        let mut config = Self::with_credentials(
            required("TMDB_API_KEY")?,
            required("OMDB_API_KEY")?,
            required("TRAKT_CLIENT_ID")?,
        );

        config.trakt_client_secret = lookup("TRAKT_CLIENT_SECRET").filter(|v| !v.is_empty());

        if let Some(url) = lookup("CINEVIBE_TMDB_BASE_URL") {
            config.tmdb_base_url = url;
        }
        if let Some(url) = lookup("CINEVIBE_TMDB_IMAGE_BASE_URL") {
            config.tmdb_image_base_url = url;
        }
        if let Some(url) = lookup("CINEVIBE_OMDB_BASE_URL") {
            config.omdb_base_url = url;
        }
        if let Some(url) = lookup("CINEVIBE_TRAKT_BASE_URL") {
            config.trakt_base_url = url;
        }

        let timeout_secs = parse_value(&lookup, "CINEVIBE_REQUEST_TIMEOUT", 10u64)?;
        config.request_timeout = Duration::from_secs(timeout_secs);
        config.max_discover_pages = parse_value(&lookup, "CINEVIBE_MAX_DISCOVER_PAGES", 2u32)?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), CineVibeError> {
        for (key, url) in [
            ("CINEVIBE_TMDB_BASE_URL", &self.tmdb_base_url),
            ("CINEVIBE_TMDB_IMAGE_BASE_URL", &self.tmdb_image_base_url),
            ("CINEVIBE_OMDB_BASE_URL", &self.omdb_base_url),
            ("CINEVIBE_TRAKT_BASE_URL", &self.trakt_base_url),
        ] {
            Url::parse(url)
                .map_err(|e| CineVibeError::config(format!("Invalid {}: {}", key, e), key))?;
        }

        if self.request_timeout.as_secs() == 0 {
            return Err(CineVibeError::config(
                "request timeout must be greater than 0 seconds",
                "CINEVIBE_REQUEST_TIMEOUT",
            ));
        }

        if self.max_discover_pages == 0 || self.max_discover_pages > 10 {
            return Err(CineVibeError::config(
                format!(
                    "max discover pages must be between 1 and 10, got {}",
                    self.max_discover_pages
                ),
                "CINEVIBE_MAX_DISCOVER_PAGES",
            ));
        }

        Ok(())
    }
}

/// Server configuration for the MCP HTTP transport and logging
///
/// # Environment Variables
///
/// - `CINEVIBE_HOST` (optional): bind host (default: "0.0.0.0")
/// - `CINEVIBE_PORT` (optional): bind port (default: 3000)
/// - `CINEVIBE_LOG_FORMAT` (optional): "json" or "pretty" (default: "json")
/// - `RUST_LOG` (optional): log filter (default: "info")
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ConfigLoader for ServerConfig {
    fn from_source<F>(lookup: F) -> Result<Self, CineVibeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_format = match lookup("CINEVIBE_LOG_FORMAT") {
            Some(value) => value.parse::<LogFormat>().map_err(|e| {
                CineVibeError::config(
                    format!("Failed to parse CINEVIBE_LOG_FORMAT: {}", e),
                    "CINEVIBE_LOG_FORMAT",
                )
            })?,
            None => defaults.log_format,
        };

        Ok(Self {
            host: lookup("CINEVIBE_HOST").unwrap_or(defaults.host),
            port: parse_value(&lookup, "CINEVIBE_PORT", defaults.port)?,
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format,
        })
    }

    fn validate(&self) -> Result<(), CineVibeError> {
        if self.port == 0 {
            return Err(CineVibeError::config(
                "port must be greater than 0",
                "CINEVIBE_PORT",
            ));
        }

        if self.host.trim().is_empty() {
            return Err(CineVibeError::config(
                "host must not be empty",
                "CINEVIBE_HOST",
            ));
        }

        Ok(())
    }
}

/// Parse a looked-up value with a default when the key is absent
///
/// # Errors
///
/// Returns a `ConfigurationError` if the value is present but cannot be parsed
fn parse_value<T, F>(lookup: &F, key: &str, default: T) -> Result<T, CineVibeError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|e| CineVibeError::config(format!("Failed to parse {}: {}", key, e), key))
        })
        .unwrap_or(Ok(default))
}

/// Load .env file if present
///
/// Does not return an error if the .env file is not found.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}
