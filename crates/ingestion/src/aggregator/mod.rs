//! Provider API clients
//!
//! Each client owns a handle to one shared `reqwest::Client` (which carries
//! the request timeout), attaches its own authentication, and maps the
//! provider's error and "no data" conventions onto [`ProviderError`].

use crate::{ProviderError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;

pub mod omdb;
pub mod tmdb;
pub mod trakt;

pub use omdb::{OmdbClient, OmdbRecord};
pub use tmdb::{
    Credits, DiscoverPage, DiscoverQuery, GenreMatch, TMDbClient, TrendingMediaType,
    TrendingWindow,
};
pub use trakt::{
    genre_slug, TraktClient, TraktComment, TraktList, TraktMovieListing, TraktTrendingKind,
};

/// Undecoded provider response body
pub type RawPayload = Value;

/// Uniform low-level access to a provider
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Provider name used in logs and errors
    fn name(&self) -> &'static str;

    /// Issue one authenticated GET against `endpoint` (relative to the base URL)
    async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<RawPayload>;
}

/// Build the HTTP client shared by every provider
pub fn build_http_client(timeout: Duration) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("cinevibe/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Status and decoded body of one provider response
pub(crate) struct HttpReply {
    pub status: StatusCode,
    pub body: Value,
}

/// Send a request and decode its body
///
/// Transport failures become `Unreachable`. An undecodable body is
/// `Malformed` on success statuses and `Null` otherwise, so the caller can
/// still classify the status.
pub(crate) async fn send(provider: &'static str, request: RequestBuilder) -> Result<HttpReply> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::unreachable(provider, describe_transport_error(&e)))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ProviderError::unreachable(provider, describe_transport_error(&e)))?;

    let body = match serde_json::from_str::<Value>(&text) {
        Ok(body) => body,
        Err(e) if status.is_success() => {
            return Err(ProviderError::malformed(
                provider,
                format!("invalid JSON body: {}", e),
            ))
        }
        Err(_) => Value::Null,
    };

    Ok(HttpReply { status, body })
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    }
}

pub(crate) fn join_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Non-empty string field
pub(crate) fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Leading year of a "YYYY-MM-DD" (or "YYYY") date
pub(crate) fn year_from_date(date: &str) -> Option<i32> {
    date.get(..4).and_then(|y| y.parse::<i32>().ok())
}

/// Names of an array of `{ "name": ... }` objects
pub(crate) fn names(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|item| str_field(item, "name")).collect())
        .unwrap_or_default()
}
