//! Enrichment orchestrator
//!
//! Builds one [`Title`] per request: TMDb details first (fatal on failure),
//! then credits, the OMDb record and Trakt community data concurrently. Every
//! failure after the primary lookup only leaves its own fields empty.

use crate::aggregator::{OmdbClient, OmdbRecord, TMDbClient, TraktClient};
use crate::genre_mapping::GenreMapper;
use crate::normalizer::present;
use crate::sentiment::analyze_comments;
use crate::Result;
use cinevibe_core::validation::validate_imdb_id;
use cinevibe_core::{CommunityData, Title};
use tracing::{debug, instrument, warn};

pub struct EnrichmentOrchestrator {
    tmdb: TMDbClient,
    omdb: OmdbClient,
    trakt: TraktClient,
    genres: GenreMapper,
}

impl EnrichmentOrchestrator {
    pub fn new(tmdb: TMDbClient, omdb: OmdbClient, trakt: TraktClient) -> Self {
        Self {
            tmdb,
            omdb,
            trakt,
            genres: GenreMapper::new(),
        }
    }

    pub fn tmdb(&self) -> &TMDbClient {
        &self.tmdb
    }

    pub fn trakt(&self) -> &TraktClient {
        &self.trakt
    }

    pub fn genres(&self) -> &GenreMapper {
        &self.genres
    }

    /// Fetch and merge everything known about one movie
    ///
    /// # Errors
    ///
    /// Only a failed TMDb details lookup is returned as an error.
    #[instrument(skip(self))]
    pub async fn get_enriched(&self, movie_id: i64, include_community: bool) -> Result<Title> {
        let mut title = self.tmdb.movie_details(movie_id).await?;

        let (credits, secondary, community) = tokio::join!(
            self.tmdb.movie_credits(movie_id),
            self.secondary_lookup(&title),
            async {
                if include_community {
                    Some(self.community_data(movie_id).await)
                } else {
                    None
                }
            }
        );

        match credits {
            Ok(credits) => {
                title.cast = credits.cast;
                title.crew = credits.crew;
            }
            Err(e) => warn!(movie_id, error = %e, "Credits unavailable"),
        }

        if let Some(record) = secondary {
            merge_secondary(&mut title, &record, &self.genres);
        }

        title.community = community;

        debug!(
            movie_id,
            has_audience = title.ratings.audience.is_some(),
            has_critic = title.ratings.critic_percentage.is_some(),
            "Title enriched"
        );

        Ok(title)
    }

    /// OMDb by IMDb id, falling back to title+year only when the id is
    /// missing, malformed or OMDb reported no match for it
    async fn secondary_lookup(&self, title: &Title) -> Option<OmdbRecord> {
        let imdb_id = title.external_id.as_deref().filter(|id| {
            let valid = validate_imdb_id(id).is_ok();
            if !valid {
                debug!(imdb_id = %id, "Malformed IMDb id, trying title and year");
            }
            valid
        });

        if let Some(imdb_id) = imdb_id {
            match self.omdb.by_imdb_id(imdb_id).await {
                Ok(record) => return Some(record),
                Err(e) if e.is_not_found() => {
                    debug!(imdb_id = %imdb_id, "No OMDb record for IMDb id, trying title and year");
                }
                Err(e) => {
                    warn!(imdb_id = %imdb_id, error = %e, "OMDb lookup failed");
                    return None;
                }
            }
        }

        let year = title.year?;
        match self.omdb.by_title(&title.name, Some(year)).await {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(name = %title.name, year, error = %e, "OMDb title lookup failed");
                None
            }
        }
    }

    /// Trakt stats, comment sentiment and related titles; each part fails alone
    #[instrument(skip(self))]
    pub async fn community_data(&self, movie_id: i64) -> CommunityData {
        let slug = match self.trakt.resolve_tmdb_id(movie_id).await {
            Ok(slug) => slug,
            Err(e) => {
                debug!(movie_id, error = %e, "Trakt slug unavailable");
                return CommunityData::default();
            }
        };

        let (stats, comments, related) = tokio::join!(
            self.trakt.movie_stats(&slug),
            self.trakt.movie_comments(&slug),
            self.trakt.related_movies(&slug)
        );

        let stats = stats
            .map_err(|e| debug!(slug = %slug, error = %e, "Trakt stats unavailable"))
            .ok();
        let sentiment = comments
            .map_err(|e| debug!(slug = %slug, error = %e, "Trakt comments unavailable"))
            .ok()
            .and_then(|comments| analyze_comments(&comments));
        let related = related
            .map_err(|e| debug!(slug = %slug, error = %e, "Trakt related unavailable"))
            .unwrap_or_default();

        CommunityData {
            stats,
            sentiment,
            related,
        }
    }
}

/// Fill a title from an OMDb record
///
/// Ratings always come from OMDb. Every other field keeps the TMDb value when
/// one is present.
pub fn merge_secondary(title: &mut Title, record: &OmdbRecord, genres: &GenreMapper) {
    let ratings = record.rating_set();
    title.ratings.audience = ratings.audience;
    title.ratings.critic_percentage = ratings.critic_percentage;
    title.ratings.critic_weighted = ratings.critic_weighted;

    fill(&mut title.external_id, record.imdb_id());
    fill(&mut title.year, record.release_year());
    fill(&mut title.runtime_minutes, record.runtime_minutes());
    fill(&mut title.overview, record.plot());
    fill(&mut title.detailed_plot, record.plot());
    fill(&mut title.awards, record.awards());
    fill(&mut title.rated, present(record.rated.as_deref()));
    fill(&mut title.writer, present(record.writer.as_deref()));
    fill(&mut title.language, present(record.language.as_deref()));
    fill(&mut title.country, present(record.country.as_deref()));
    fill(&mut title.box_office, present(record.box_office.as_deref()));

    if title.genres.is_empty() {
        if let Some(raw) = present(record.genre.as_deref()) {
            title.genres = genres.map_omdb_genre_list(&raw);
        }
    }
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}
