//! OMDb API client
//!
//! Secondary provider: IMDb audience rating, Rotten Tomatoes and Metacritic
//! critic scores, awards text and a long-form plot. Authenticated with the
//! `apikey` query parameter. OMDb answers "no data" with HTTP 200 and
//! `{"Response": "False", "Error": "..."}`.

use super::{join_url, send, str_field, ProviderClient, RawPayload};
use crate::normalizer::{normalize, percentage, present, RatingScale};
use crate::{ProviderError, Result};
use async_trait::async_trait;
use cinevibe_core::{ProviderConfig, RatingSet};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

const PROVIDER: &str = "omdb";

#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// One entry of OMDb's `Ratings` array
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OmdbRating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// OMDb title record
///
/// Every field is kept as OMDb's raw string; use the accessors to get values
/// with the "N/A" sentinel mapped to `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OmdbRecord {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Rated")]
    pub rated: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "Writer")]
    pub writer: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Language")]
    pub language: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Awards")]
    pub awards: Option<String>,
    #[serde(rename = "Ratings")]
    pub ratings: Vec<OmdbRating>,
    #[serde(rename = "Metascore")]
    pub metascore: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "BoxOffice")]
    pub box_office: Option<String>,
}

impl OmdbRecord {
    /// Ratings sourced from OMDb; `canonical` is left unset
    pub fn rating_set(&self) -> RatingSet {
        let critic_weighted = self
            .metascore
            .as_deref()
            .and_then(|raw| percentage(raw, RatingScale::Integer100))
            .or_else(|| {
                self.rating_value("Metacritic")
                    .and_then(|raw| percentage(raw, RatingScale::OutOf100String))
            });

        RatingSet {
            canonical: None,
            audience: self
                .imdb_rating
                .as_deref()
                .and_then(|raw| normalize(raw, RatingScale::Decimal10)),
            critic_percentage: self
                .rating_value("Rotten Tomatoes")
                .and_then(|raw| percentage(raw, RatingScale::PercentString)),
            critic_weighted,
        }
    }

    fn rating_value(&self, source: &str) -> Option<&str> {
        self.ratings
            .iter()
            .find(|r| r.source == source)
            .map(|r| r.value.as_str())
    }

    /// "148 min" -> 148
    pub fn runtime_minutes(&self) -> Option<u32> {
        present(self.runtime.as_deref())?
            .split_whitespace()
            .next()?
            .parse::<u32>()
            .ok()
            .filter(|m| *m > 0)
    }

    /// "2010" or "2010–2015" -> 2010
    pub fn release_year(&self) -> Option<i32> {
        let year = present(self.year.as_deref())?;
        year.get(..4)?.parse::<i32>().ok()
    }

    pub fn awards(&self) -> Option<String> {
        present(self.awards.as_deref())
    }

    pub fn plot(&self) -> Option<String> {
        present(self.plot.as_deref())
    }

    pub fn imdb_id(&self) -> Option<String> {
        present(self.imdb_id.as_deref())
    }
}

impl OmdbClient {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            api_key: config.omdb_api_key.clone(),
            base_url: config.omdb_base_url.clone(),
        }
    }

    /// Look up a title by IMDb id, with the full plot
    #[instrument(skip(self))]
    pub async fn by_imdb_id(&self, imdb_id: &str) -> Result<OmdbRecord> {
        let params = [("i", imdb_id.to_string()), ("plot", "full".to_string())];
        let data = self.fetch("", &params).await?;
        Self::parse_record(data)
    }

    /// Look up a title by exact title and optional year, with the full plot
    #[instrument(skip(self))]
    pub async fn by_title(&self, title: &str, year: Option<i32>) -> Result<OmdbRecord> {
        let mut params = vec![("t", title.to_string()), ("plot", "full".to_string())];
        if let Some(y) = year {
            params.push(("y", y.to_string()));
        }

        let data = self.fetch("", &params).await?;
        Self::parse_record(data)
    }

    fn parse_record(data: RawPayload) -> Result<OmdbRecord> {
        let record: OmdbRecord = serde_json::from_value(data)
            .map_err(|e| ProviderError::malformed(PROVIDER, e.to_string()))?;

        if record.title.is_none() {
            return Err(ProviderError::malformed(PROVIDER, "Missing Title"));
        }

        Ok(record)
    }
}

#[async_trait]
impl ProviderClient for OmdbClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<RawPayload> {
        let url = join_url(&self.base_url, endpoint);
        debug!("OMDb request");

        let request = self
            .client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params);

        let reply = send(PROVIDER, request).await?;

        if !reply.status.is_success() {
            let detail = str_field(&reply.body, "Error").unwrap_or_default();
            return Err(ProviderError::unreachable(
                PROVIDER,
                format!("HTTP {} {}", reply.status.as_u16(), detail)
                    .trim_end()
                    .to_string(),
            ));
        }

        if str_field(&reply.body, "Response").as_deref() == Some("False") {
            let message =
                str_field(&reply.body, "Error").unwrap_or_else(|| "No match".to_string());
            return Err(ProviderError::not_found(PROVIDER, message));
        }

        Ok(reply.body)
    }
}
