//! Trakt API client
//!
//! Tertiary provider for community data. Authenticated with the
//! `trakt-api-key` and `trakt-api-version` headers. A 404 or an empty search
//! result means "no data".

use super::{join_url, send, str_field, ProviderClient, RawPayload};
use crate::genre_mapping::CanonicalGenre;
use crate::{ProviderError, Result};
use async_trait::async_trait;
use cinevibe_core::{
    CommunityPick, CommunityStats, CommunityTrendingEntry, ProviderConfig, RelatedTitle,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, instrument};

const PROVIDER: &str = "trakt";
const API_VERSION: &str = "2";

#[derive(Clone)]
pub struct TraktClient {
    client: Client,
    client_id: String,
    base_url: String,
}

/// A single user comment
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TraktComment {
    pub comment: String,
    pub spoiler: bool,
    pub review: bool,
    pub likes: u64,
}

/// Which trending list to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraktTrendingKind {
    Movies,
    Shows,
}

impl FromStr for TraktTrendingKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "movies" => Ok(Self::Movies),
            "shows" => Ok(Self::Shows),
            other => Err(format!(
                "media_type must be 'movies' or 'shows', got '{}'",
                other
            )),
        }
    }
}

impl TraktTrendingKind {
    fn path(&self) -> &'static str {
        match self {
            Self::Movies => "movies",
            Self::Shows => "shows",
        }
    }

    fn item_key(&self) -> &'static str {
        match self {
            Self::Movies => "movie",
            Self::Shows => "show",
        }
    }
}

/// A public user list found by search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraktList {
    pub id: i64,
    pub name: String,
}

/// Movie listings that accept genre and rating filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraktMovieListing {
    Popular,
    Trending,
    /// Most watched of all time
    Watched,
}

impl TraktMovieListing {
    fn path(&self) -> &'static str {
        match self {
            Self::Popular => "movies/popular",
            Self::Trending => "movies/trending",
            Self::Watched => "movies/watched/all",
        }
    }
}

/// Trakt genre slug, e.g. "science-fiction"
pub fn genre_slug(genre: CanonicalGenre) -> String {
    genre.as_str().to_lowercase().replace(' ', "-")
}

impl TraktClient {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            client_id: config.trakt_client_id.clone(),
            base_url: config.trakt_base_url.clone(),
        }
    }

    /// Resolve a TMDb movie id to a Trakt slug
    #[instrument(skip(self))]
    pub async fn resolve_tmdb_id(&self, tmdb_id: i64) -> Result<String> {
        let data = self
            .fetch(
                &format!("search/tmdb/{}", tmdb_id),
                &[("type", "movie".to_string())],
            )
            .await?;

        data.as_array()
            .and_then(|results| results.first())
            .and_then(|hit| hit.get("movie"))
            .and_then(|movie| movie.get("ids"))
            .and_then(|ids| str_field(ids, "slug"))
            .ok_or_else(|| {
                ProviderError::not_found(PROVIDER, format!("No Trakt movie for TMDb id {}", tmdb_id))
            })
    }

    #[instrument(skip(self))]
    pub async fn movie_stats(&self, slug: &str) -> Result<CommunityStats> {
        let data = self
            .fetch(&format!("movies/{}/stats", urlencoding::encode(slug)), &[])
            .await?;

        Ok(CommunityStats {
            watchers: count(&data, "watchers"),
            plays: count(&data, "plays"),
            collectors: count(&data, "collectors"),
            comments: count(&data, "comments"),
            lists: count(&data, "lists"),
            votes: count(&data, "votes"),
        })
    }

    #[instrument(skip(self))]
    pub async fn movie_comments(&self, slug: &str) -> Result<Vec<TraktComment>> {
        let data = self
            .fetch(
                &format!("movies/{}/comments/likes", urlencoding::encode(slug)),
                &[("limit", "50".to_string())],
            )
            .await?;

        serde_json::from_value(data).map_err(|e| ProviderError::malformed(PROVIDER, e.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn related_movies(&self, slug: &str) -> Result<Vec<RelatedTitle>> {
        let data = self
            .fetch(
                &format!("movies/{}/related", urlencoding::encode(slug)),
                &[("limit", "10".to_string())],
            )
            .await?;

        Ok(data
            .as_array()
            .map(|items| items.iter().filter_map(parse_related).collect())
            .unwrap_or_default())
    }

    /// Titles currently being watched the most
    #[instrument(skip(self))]
    pub async fn trending(
        &self,
        kind: TraktTrendingKind,
        limit: u32,
    ) -> Result<Vec<CommunityTrendingEntry>> {
        let data = self
            .fetch(
                &format!("{}/trending", kind.path()),
                &[("limit", limit.to_string())],
            )
            .await?;

        Ok(data
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let media = item.get(kind.item_key())?;
                        let ids = media.get("ids");
                        Some(CommunityTrendingEntry {
                            watchers: count(item, "watchers"),
                            title: str_field(media, "title")?,
                            year: media.get("year").and_then(as_year),
                            tmdb_id: ids.and_then(|ids| ids.get("tmdb")).and_then(|v| v.as_i64()),
                            imdb_id: ids.and_then(|ids| str_field(ids, "imdb")),
                        })
                    })
                    .take(limit as usize)
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Public user lists matching a keyword, best match first
    #[instrument(skip(self))]
    pub async fn search_lists(&self, query: &str, limit: u32) -> Result<Vec<TraktList>> {
        let data = self
            .fetch(
                "search/list",
                &[("query", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        Ok(data
            .as_array()
            .map(|hits| {
                hits.iter()
                    .filter_map(|hit| {
                        let list = hit.get("list")?;
                        Some(TraktList {
                            id: list.get("ids")?.get("trakt")?.as_i64()?,
                            name: str_field(list, "name")?,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Movies saved on one user list, in list order
    #[instrument(skip(self), fields(list_id = list.id))]
    pub async fn list_movies(&self, list: &TraktList) -> Result<Vec<CommunityPick>> {
        let data = self
            .fetch(&format!("lists/{}/items/movies", list.id), &[])
            .await?;

        Ok(data
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| parse_pick(item.get("movie")?))
                    .map(|pick| CommunityPick {
                        source_list: Some(list.name.clone()),
                        ..pick
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    /// One page of a movie listing narrowed by Trakt filters
    ///
    /// Popular items are bare movies; trending and watched items wrap the
    /// movie with counters.
    #[instrument(skip(self))]
    pub async fn movie_listing(
        &self,
        listing: TraktMovieListing,
        filters: &[(&'static str, String)],
        limit: u32,
    ) -> Result<Vec<CommunityPick>> {
        let mut params = filters.to_vec();
        params.push(("limit", limit.to_string()));

        let data = self.fetch(listing.path(), &params).await?;

        Ok(data
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| parse_pick(item.get("movie").unwrap_or(item)))
                    .take(limit as usize)
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl ProviderClient for TraktClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<RawPayload> {
        let url = join_url(&self.base_url, endpoint);
        debug!(endpoint, "Trakt request");

        let request = self
            .client
            .get(&url)
            .header("Content-Type", "application/json")
            .header("trakt-api-version", API_VERSION)
            .header("trakt-api-key", &self.client_id)
            .query(params);

        let reply = send(PROVIDER, request).await?;

        if reply.status == StatusCode::NOT_FOUND {
            return Err(ProviderError::not_found(PROVIDER, format!("{} not found", endpoint)));
        }

        if !reply.status.is_success() {
            return Err(ProviderError::unreachable(
                PROVIDER,
                format!("HTTP {}", reply.status.as_u16()),
            ));
        }

        Ok(reply.body)
    }
}

fn count(data: &Value, key: &str) -> u64 {
    data.get(key).and_then(|v| v.as_u64()).unwrap_or(0)
}

fn as_year(value: &Value) -> Option<i32> {
    value.as_i64().and_then(|y| i32::try_from(y).ok())
}

fn parse_related(item: &Value) -> Option<RelatedTitle> {
    Some(RelatedTitle {
        title: str_field(item, "title")?,
        year: item.get("year").and_then(as_year),
        tmdb_id: item
            .get("ids")
            .and_then(|ids| ids.get("tmdb"))
            .and_then(|v| v.as_i64()),
    })
}

fn parse_pick(movie: &Value) -> Option<CommunityPick> {
    let ids = movie.get("ids");
    Some(CommunityPick {
        title: str_field(movie, "title")?,
        year: movie.get("year").and_then(as_year),
        tmdb_id: ids.and_then(|ids| ids.get("tmdb")).and_then(|v| v.as_i64()),
        imdb_id: ids.and_then(|ids| str_field(ids, "imdb")),
        source_list: None,
    })
}
