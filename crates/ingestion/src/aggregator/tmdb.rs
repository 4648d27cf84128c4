//! TMDb (The Movie Database) API client
//!
//! Primary provider: identity, descriptive metadata, credits, listings and
//! the canonical rating. Authenticated with the v3 `api_key` query parameter.

use super::{join_url, names, send, str_field, year_from_date, HttpReply, ProviderClient, RawPayload};
use crate::genre_mapping::GenreMapper;
use crate::normalizer::normalize_decimal;
use crate::{ProviderError, Result};
use async_trait::async_trait;
use cinevibe_core::{CastMember, MediaType, ProviderConfig, Title};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, instrument};

const PROVIDER: &str = "tmdb";

/// Crew jobs kept on an enriched title
pub const KEY_CREW_JOBS: [&str; 6] = [
    "Director",
    "Producer",
    "Executive Producer",
    "Screenplay",
    "Story",
    "Music",
];

/// Number of cast members kept on an enriched title
pub const TOP_CAST: usize = 10;

/// TMDb API client
#[derive(Clone)]
pub struct TMDbClient {
    client: Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
}

/// Cast and key crew of one title
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credits {
    pub cast: Vec<CastMember>,
    pub crew: BTreeMap<String, Vec<String>>,
}

/// How `with_genres` combines several ids
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenreMatch {
    /// Every genre required (ids joined with ",")
    All,
    /// At least one genre required (ids joined with "|")
    #[default]
    Any,
}

/// Filters pushed down to `/discover/movie`
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    pub sort_by: String,
    pub min_votes: Option<u32>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub with_genres: Vec<u32>,
    pub genre_match: GenreMatch,
    pub without_genres: Vec<u32>,
    pub min_runtime: Option<u32>,
    pub max_runtime: Option<u32>,
    /// Latest allowed primary release date, "YYYY-MM-DD"
    pub released_before: Option<String>,
    pub page: u32,
}

impl Default for DiscoverQuery {
    fn default() -> Self {
        Self {
            sort_by: "popularity.desc".to_string(),
            min_votes: None,
            min_rating: None,
            max_rating: None,
            with_genres: Vec::new(),
            genre_match: GenreMatch::Any,
            without_genres: Vec::new(),
            min_runtime: None,
            max_runtime: None,
            released_before: None,
            page: 1,
        }
    }
}

impl DiscoverQuery {
    /// Query parameters, excluding authentication
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("sort_by", self.sort_by.clone()),
            ("include_adult", "false".to_string()),
            ("page", self.page.max(1).to_string()),
        ];

        if let Some(votes) = self.min_votes {
            params.push(("vote_count.gte", votes.to_string()));
        }
        if let Some(rating) = self.min_rating {
            params.push(("vote_average.gte", rating.to_string()));
        }
        if let Some(rating) = self.max_rating {
            params.push(("vote_average.lte", rating.to_string()));
        }
        if !self.with_genres.is_empty() {
            let separator = match self.genre_match {
                GenreMatch::All => ",",
                GenreMatch::Any => "|",
            };
            params.push(("with_genres", join_ids(&self.with_genres, separator)));
        }
        if !self.without_genres.is_empty() {
            params.push(("without_genres", join_ids(&self.without_genres, ",")));
        }
        if let Some(runtime) = self.min_runtime {
            params.push(("with_runtime.gte", runtime.to_string()));
        }
        if let Some(runtime) = self.max_runtime {
            params.push(("with_runtime.lte", runtime.to_string()));
        }
        if let Some(date) = &self.released_before {
            params.push(("primary_release_date.lte", date.clone()));
        }

        params
    }
}

fn join_ids(ids: &[u32], separator: &str) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

/// One page of discovery candidates, in provider order
#[derive(Debug, Clone, Default)]
pub struct DiscoverPage {
    pub results: Vec<Title>,
    pub page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendingMediaType {
    Movie,
    Tv,
    All,
}

impl FromStr for TrendingMediaType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "tv" => Ok(Self::Tv),
            "all" => Ok(Self::All),
            other => Err(format!(
                "media_type must be 'movie', 'tv', or 'all', got '{}'",
                other
            )),
        }
    }
}

impl TrendingMediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendingWindow {
    Day,
    Week,
}

impl FromStr for TrendingWindow {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            other => Err(format!(
                "time_window must be 'day' or 'week', got '{}'",
                other
            )),
        }
    }
}

impl TrendingWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

impl TMDbClient {
    /// Create a TMDb client from provider configuration
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            api_key: config.tmdb_api_key.clone(),
            base_url: config.tmdb_base_url.clone(),
            image_base_url: config.tmdb_image_base_url.clone(),
        }
    }

    /// Search for movies by title
    #[instrument(skip(self))]
    pub async fn search_movies(&self, query: &str, year: Option<i32>, page: u32) -> Result<Vec<Title>> {
        let mut params = vec![
            ("query", query.to_string()),
            ("page", page.max(1).to_string()),
            ("include_adult", "false".to_string()),
        ];
        if let Some(y) = year {
            params.push(("year", y.to_string()));
        }

        let data = self.fetch("search/movie", &params).await?;
        self.parse_listing(&data, MediaType::Movie)
    }

    /// Search for TV shows by name
    #[instrument(skip(self))]
    pub async fn search_tv(&self, query: &str, year: Option<i32>, page: u32) -> Result<Vec<Title>> {
        let mut params = vec![
            ("query", query.to_string()),
            ("page", page.max(1).to_string()),
            ("include_adult", "false".to_string()),
        ];
        if let Some(y) = year {
            params.push(("first_air_date_year", y.to_string()));
        }

        let data = self.fetch("search/tv", &params).await?;
        self.parse_listing(&data, MediaType::Tv)
    }

    /// Get movie details by TMDb ID
    #[instrument(skip(self))]
    pub async fn movie_details(&self, movie_id: i64) -> Result<Title> {
        let data = self.fetch(&format!("movie/{}", movie_id), &[]).await?;
        self.parse_movie_details(&data)
    }

    /// Get cast and key crew for a movie
    #[instrument(skip(self))]
    pub async fn movie_credits(&self, movie_id: i64) -> Result<Credits> {
        let data = self
            .fetch(&format!("movie/{}/credits", movie_id), &[])
            .await?;
        Ok(self.parse_credits(&data))
    }

    /// Get TV show details by TMDb ID
    #[instrument(skip(self))]
    pub async fn tv_details(&self, tv_id: i64) -> Result<Title> {
        let data = self.fetch(&format!("tv/{}", tv_id), &[]).await?;
        self.parse_tv_details(&data)
    }

    /// Filtered movie listing
    #[instrument(skip(self))]
    pub async fn discover_movies(&self, query: &DiscoverQuery) -> Result<DiscoverPage> {
        let data = self.fetch("discover/movie", &query.to_params()).await?;

        let page = data
            .get("page")
            .and_then(|v| v.as_u64())
            .unwrap_or(u64::from(query.page)) as u32;
        let total_pages = data
            .get("total_pages")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32;

        Ok(DiscoverPage {
            results: self.parse_listing(&data, MediaType::Movie)?,
            page,
            total_pages,
        })
    }

    /// Trending titles for a media type and time window
    #[instrument(skip(self))]
    pub async fn trending(
        &self,
        media_type: TrendingMediaType,
        window: TrendingWindow,
    ) -> Result<Vec<Title>> {
        let endpoint = format!("trending/{}/{}", media_type.as_str(), window.as_str());
        let data = self.fetch(&endpoint, &[]).await?;

        let default_type = match media_type {
            TrendingMediaType::Tv => MediaType::Tv,
            TrendingMediaType::Movie | TrendingMediaType::All => MediaType::Movie,
        };
        self.parse_listing(&data, default_type)
    }

    fn classify(reply: HttpReply) -> Result<RawPayload> {
        if reply.status.is_success() {
            return Ok(reply.body);
        }

        let message = str_field(&reply.body, "status_message")
            .unwrap_or_else(|| format!("HTTP {}", reply.status));

        // TMDb signals "no such resource" with a 404 carrying `"success": false`
        let explicit_miss = reply.body.get("success").and_then(|v| v.as_bool()) == Some(false);
        if reply.status == StatusCode::NOT_FOUND && explicit_miss {
            return Err(ProviderError::not_found(PROVIDER, message));
        }

        Err(ProviderError::unreachable(
            PROVIDER,
            format!("HTTP {}: {}", reply.status.as_u16(), message),
        ))
    }

    fn poster_url(&self, data: &Value, key: &str) -> Option<String> {
        str_field(data, key).map(|path| format!("{}{}", self.image_base_url, path))
    }

    /// Parse a `results` array; unusable entries are skipped
    fn parse_listing(&self, data: &Value, default_type: MediaType) -> Result<Vec<Title>> {
        let results = data
            .get("results")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "No results array in response"))?;

        Ok(results
            .iter()
            .filter(|item| str_field(item, "media_type").as_deref() != Some("person"))
            .filter_map(|item| match self.parse_listing_item(item, default_type) {
                Ok(title) => Some(title),
                Err(e) => {
                    debug!(error = %e, "Skipping listing entry");
                    None
                }
            })
            .collect())
    }

    fn parse_listing_item(&self, item: &Value, default_type: MediaType) -> Result<Title> {
        let media_type = match str_field(item, "media_type").as_deref() {
            Some("tv") => MediaType::Tv,
            Some("movie") => MediaType::Movie,
            _ => default_type,
        };

        let (name_key, date_key) = match media_type {
            MediaType::Movie => ("title", "release_date"),
            MediaType::Tv => ("name", "first_air_date"),
        };

        let id = item
            .get("id")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "Missing id"))?;

        let name = str_field(item, name_key)
            .ok_or_else(|| ProviderError::malformed(PROVIDER, format!("Missing {}", name_key)))?;

        let mut title = Title::new(id, name, media_type);
        title.release_date = str_field(item, date_key);
        title.year = title.release_date.as_deref().and_then(year_from_date);
        title.overview = str_field(item, "overview");
        title.poster_url = self.poster_url(item, "poster_path");
        title.popularity = item.get("popularity").and_then(|v| v.as_f64());
        title.vote_count = item.get("vote_count").and_then(|v| v.as_u64());
        title.ratings.canonical = canonical_rating(item, title.vote_count);

        let genre_ids: Vec<u32> = item
            .get("genre_ids")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|g| g.as_u64().map(|id| id as u32))
                    .collect()
            })
            .unwrap_or_default();
        title.genres = GenreMapper::names_from_tmdb_ids(&genre_ids);

        Ok(title)
    }

    fn parse_movie_details(&self, data: &Value) -> Result<Title> {
        let id = data
            .get("id")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "Missing id"))?;

        let name = str_field(data, "title")
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "Missing title"))?;

        let mut title = Title::new(id, name, MediaType::Movie);
        title.external_id = str_field(data, "imdb_id");
        title.tagline = str_field(data, "tagline");
        title.release_date = str_field(data, "release_date");
        title.year = title.release_date.as_deref().and_then(year_from_date);
        title.runtime_minutes = positive_u32(data, "runtime");
        title.genres = names(data, "genres");
        title.production_companies = names(data, "production_companies");
        title.overview = str_field(data, "overview");
        title.budget = positive_u64(data, "budget");
        title.revenue = positive_u64(data, "revenue");
        title.vote_count = data.get("vote_count").and_then(|v| v.as_u64());
        title.popularity = data.get("popularity").and_then(|v| v.as_f64());
        title.poster_url = self.poster_url(data, "poster_path");
        title.status = str_field(data, "status");
        title.ratings.canonical = canonical_rating(data, title.vote_count);

        Ok(title)
    }

    fn parse_tv_details(&self, data: &Value) -> Result<Title> {
        let id = data
            .get("id")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "Missing id"))?;

        let name = str_field(data, "name")
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "Missing name"))?;

        let mut title = Title::new(id, name, MediaType::Tv);
        title.tagline = str_field(data, "tagline");
        title.release_date = str_field(data, "first_air_date");
        title.year = title.release_date.as_deref().and_then(year_from_date);
        title.runtime_minutes = data
            .get("episode_run_time")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|v| v.as_u64())
            .filter(|m| *m > 0)
            .map(|m| m as u32);
        title.genres = names(data, "genres");
        title.production_companies = names(data, "production_companies");
        title.overview = str_field(data, "overview");
        title.vote_count = data.get("vote_count").and_then(|v| v.as_u64());
        title.popularity = data.get("popularity").and_then(|v| v.as_f64());
        title.poster_url = self.poster_url(data, "poster_path");
        title.number_of_seasons = positive_u32(data, "number_of_seasons");
        title.number_of_episodes = positive_u32(data, "number_of_episodes");
        title.status = str_field(data, "status");
        title.ratings.canonical = canonical_rating(data, title.vote_count);

        let creators = names(data, "created_by");
        if !creators.is_empty() {
            title.crew.insert("Creator".to_string(), creators);
        }

        Ok(title)
    }

    fn parse_credits(&self, data: &Value) -> Credits {
        let cast = data
            .get("cast")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|actor| {
                        Some(CastMember {
                            name: str_field(actor, "name")?,
                            character: str_field(actor, "character"),
                            profile_url: self.poster_url(actor, "profile_path"),
                        })
                    })
                    .take(TOP_CAST)
                    .collect()
            })
            .unwrap_or_default();

        let mut crew: BTreeMap<String, Vec<String>> = BTreeMap::new();
        if let Some(members) = data.get("crew").and_then(|v| v.as_array()) {
            for person in members {
                let (Some(job), Some(name)) = (str_field(person, "job"), str_field(person, "name"))
                else {
                    continue;
                };
                if KEY_CREW_JOBS.contains(&job.as_str()) {
                    crew.entry(job).or_default().push(name);
                }
            }
        }

        Credits { cast, crew }
    }
}

#[async_trait]
impl ProviderClient for TMDbClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<RawPayload> {
        let url = join_url(&self.base_url, endpoint);
        debug!(endpoint, "TMDb request");

        let request = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params);

        Self::classify(send(PROVIDER, request).await?)
    }
}

/// TMDb reports 0.0 for titles nobody has voted on yet
fn canonical_rating(data: &Value, vote_count: Option<u64>) -> Option<f64> {
    if vote_count == Some(0) {
        return None;
    }
    data.get("vote_average")
        .and_then(|v| v.as_f64())
        .and_then(normalize_decimal)
}

fn positive_u32(data: &Value, key: &str) -> Option<u32> {
    data.get(key)
        .and_then(|v| v.as_u64())
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
}

fn positive_u64(data: &Value, key: &str) -> Option<u64> {
    data.get(key).and_then(|v| v.as_u64()).filter(|v| *v > 0)
}
