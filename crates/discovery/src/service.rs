//! Vibe service
//!
//! One async method per tool. Arguments are validated here; provider errors
//! are converted into [`CineVibeError`] at this boundary.

use crate::classifier::{analyze, VibeAnalysis};
use crate::community::{genre_listing, CommunityVibe};
use crate::mismatch::{classification_label, sort_mismatches, Mismatch, DEFAULT_MIN_GAP};
use crate::rules::{resolve, Mood, Personality, RuleSet, TimeContext, VibeModifier};
use chrono::{Datelike, Utc};
use cinevibe_core::validation::{
    validate_limit, validate_min_gap, validate_query, validate_release_year, validate_title_id,
};
use cinevibe_core::{
    CineVibeError, CommunityPick, CommunityTrendingEntry, ProviderConfig, Result, Title,
    TitleSummary,
};
use cinevibe_ingestion::aggregator::{genre_slug, TraktTrendingKind};
use cinevibe_ingestion::{
    build_http_client, CanonicalGenre, EnrichmentOrchestrator, OmdbClient, TMDbClient,
    TraktClient, TrendingMediaType, TrendingWindow,
};
use futures::future::join_all;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Maximum entries in search and trending listings
pub const MAX_LISTING_RESULTS: usize = 10;
/// Search results enriched when looking for mismatches
pub const MISMATCH_CANDIDATES: usize = 10;
pub const MAX_DISCOVERY_LIMIT: u32 = 20;
pub const PERSONALITY_RESULTS: usize = 15;
pub const MAX_COMMUNITY_TRENDING: u32 = 20;
/// User lists read per vibe keyword
pub const VIBE_LISTS_SCANNED: u32 = 5;

pub struct VibeService {
    enrichment: EnrichmentOrchestrator,
    max_discover_pages: u32,
    current_year: Option<i32>,
}

impl VibeService {
    pub fn new(enrichment: EnrichmentOrchestrator, max_discover_pages: u32) -> Self {
        Self {
            enrichment,
            max_discover_pages: max_discover_pages.max(1),
            current_year: None,
        }
    }

    /// Build every provider client from one shared HTTP client
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let http = build_http_client(config.request_timeout)
            .map_err(|e| CineVibeError::internal(format!("Failed to build HTTP client: {}", e)))?;

        let enrichment = EnrichmentOrchestrator::new(
            TMDbClient::new(http.clone(), config),
            OmdbClient::new(http.clone(), config),
            TraktClient::new(http, config),
        );

        Ok(Self::new(enrichment, config.max_discover_pages))
    }

    /// Pin the year used for age constraints
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    fn current_year(&self) -> i32 {
        self.current_year.unwrap_or_else(|| Utc::now().year())
    }

    #[instrument(skip(self))]
    pub async fn search_titles(&self, query: &str, year: Option<i32>) -> Result<Vec<TitleSummary>> {
        let query = validate_query(query, "query")?;
        year.map(validate_release_year).transpose()?;

        let results = self.enrichment.tmdb().search_movies(query, year, 1).await?;
        Ok(summaries(results, MAX_LISTING_RESULTS))
    }

    #[instrument(skip(self))]
    pub async fn search_tv_shows(&self, query: &str, year: Option<i32>) -> Result<Vec<TitleSummary>> {
        let query = validate_query(query, "query")?;
        year.map(validate_release_year).transpose()?;

        let results = self.enrichment.tmdb().search_tv(query, year, 1).await?;
        Ok(summaries(results, MAX_LISTING_RESULTS))
    }

    /// Enriched movie with its rating analysis label
    #[instrument(skip(self))]
    pub async fn get_enriched_details(&self, title_id: i64) -> Result<Title> {
        self.enriched(title_id, false).await
    }

    #[instrument(skip(self))]
    pub async fn get_enriched_details_with_community(&self, title_id: i64) -> Result<Title> {
        self.enriched(title_id, true).await
    }

    async fn enriched(&self, title_id: i64, include_community: bool) -> Result<Title> {
        validate_title_id(title_id, "title_id")?;

        let mut title = self
            .enrichment
            .get_enriched(title_id, include_community)
            .await?;
        title.rating_analysis = Some(classification_label(&title.ratings, DEFAULT_MIN_GAP));
        Ok(title)
    }

    #[instrument(skip(self))]
    pub async fn get_tv_details(&self, tv_id: i64) -> Result<Title> {
        validate_title_id(tv_id, "tv_id")?;
        Ok(self.enrichment.tmdb().tv_details(tv_id).await?)
    }

    /// Search, enrich the top results concurrently, keep the disagreements
    #[instrument(skip(self))]
    pub async fn find_rating_mismatches(&self, query: &str, min_gap: f64) -> Result<Vec<Mismatch>> {
        let query = validate_query(query, "query")?;
        validate_min_gap(min_gap)?;

        let candidates = self.enrichment.tmdb().search_movies(query, None, 1).await?;
        let lookups = candidates
            .iter()
            .take(MISMATCH_CANDIDATES)
            .map(|c| self.enrichment.get_enriched(c.provider_id, false));

        let mut mismatches: Vec<Mismatch> = join_all(lookups)
            .await
            .into_iter()
            .filter_map(|result| match result {
                Ok(title) => Mismatch::from_title(&title, min_gap),
                Err(e) => {
                    warn!(error = %e, "Skipping candidate that could not be enriched");
                    None
                }
            })
            .collect();

        sort_mismatches(&mut mismatches);
        info!(count = mismatches.len(), "Rating mismatches found");
        Ok(mismatches)
    }

    /// Titles like the reference, shifted by a vibe modifier
    #[instrument(skip(self))]
    pub async fn find_by_vibe_modifier(
        &self,
        reference_title: &str,
        modifier: &str,
        limit: u32,
    ) -> Result<Vec<TitleSummary>> {
        let reference_title = validate_query(reference_title, "reference_title")?;
        validate_limit(limit, 1, MAX_DISCOVERY_LIMIT)?;

        let rule = resolve::<VibeModifier>(modifier);

        let reference = self
            .enrichment
            .tmdb()
            .search_movies(reference_title, None, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                CineVibeError::not_found(format!(
                    "No title found matching '{}'",
                    reference_title
                ))
            })?;

        let reference_genres = if reference.genres.is_empty() {
            self.enrichment
                .tmdb()
                .movie_details(reference.provider_id)
                .await?
                .genres
        } else {
            reference.genres.clone()
        };

        let own_genres: Vec<CanonicalGenre> = reference_genres
            .iter()
            .filter_map(|name| CanonicalGenre::from_name(name))
            .collect();
        let genres: Vec<CanonicalGenre> = own_genres
            .iter()
            .copied()
            .filter(|g| !rule.excluded_genres.contains(g))
            .collect();

        // An empty list would lift the genre constraint entirely
        if genres.is_empty() && !own_genres.is_empty() {
            warn!(
                reference_id = reference.provider_id,
                rule = %rule.name,
                "Modifier excludes every reference genre"
            );
            return Ok(Vec::new());
        }

        debug!(
            reference_id = reference.provider_id,
            genres = genres.len(),
            rule = %rule.name,
            "Resolved vibe reference"
        );

        let rule = rule.any_of(&genres);
        self.discover(&rule, limit as usize, Some(reference.provider_id))
            .await
    }

    /// Titles for a mood, optionally tightened by a time of day
    #[instrument(skip(self))]
    pub async fn find_by_mood(
        &self,
        mood: &str,
        time_context: Option<&str>,
        limit: u32,
    ) -> Result<Vec<TitleSummary>> {
        validate_limit(limit, 1, MAX_DISCOVERY_LIMIT)?;

        let mut rule = resolve::<Mood>(mood);
        if let Some(context) = time_context.filter(|c| !c.trim().is_empty()) {
            rule = rule.overlay(&resolve::<TimeContext>(context));
        }

        self.discover(&rule, limit as usize, None).await
    }

    /// Titles matching a rating personality archetype
    #[instrument(skip(self))]
    pub async fn find_by_personality(
        &self,
        personality: &str,
        genre_filter: Option<&str>,
    ) -> Result<Vec<TitleSummary>> {
        let mut rule = resolve::<Personality>(personality);

        if let Some(name) = genre_filter.map(str::trim).filter(|n| !n.is_empty()) {
            let genre = self.enrichment.genres().resolve(name).ok_or_else(|| {
                CineVibeError::validation_field(format!("Unknown genre '{}'", name), "genre_filter")
            })?;
            if !rule.all_genres.contains(&genre) {
                rule.all_genres.push(genre);
            }
        }

        self.discover(&rule, PERSONALITY_RESULTS, None).await
    }

    /// Tags, mood, viewing time and scores for one title
    #[instrument(skip(self))]
    pub async fn analyze_title_vibe(&self, title_id: i64) -> Result<VibeAnalysis> {
        validate_title_id(title_id, "title_id")?;

        let title = self.enrichment.get_enriched(title_id, false).await?;
        Ok(analyze(&title, self.current_year()))
    }

    #[instrument(skip(self))]
    pub async fn get_trending(&self, media_type: &str, time_window: &str) -> Result<Vec<TitleSummary>> {
        let media_type: TrendingMediaType = media_type
            .parse()
            .map_err(|e: String| CineVibeError::validation_field(e, "media_type"))?;
        let window: TrendingWindow = time_window
            .parse()
            .map_err(|e: String| CineVibeError::validation_field(e, "time_window"))?;

        let results = self.enrichment.tmdb().trending(media_type, window).await?;
        Ok(summaries(results, MAX_LISTING_RESULTS))
    }

    #[instrument(skip(self))]
    pub async fn get_community_trending(
        &self,
        media_type: &str,
        limit: u32,
    ) -> Result<Vec<CommunityTrendingEntry>> {
        let kind: TraktTrendingKind = media_type
            .parse()
            .map_err(|e: String| CineVibeError::validation_field(e, "media_type"))?;
        validate_limit(limit, 1, MAX_COMMUNITY_TRENDING)?;

        Ok(self.enrichment.trakt().trending(kind, limit).await?)
    }

    /// Movies from Trakt user lists whose names match a vibe keyword
    ///
    /// Lists are read in search order until `limit` distinct movies are
    /// collected. A list that cannot be read is skipped.
    #[instrument(skip(self))]
    pub async fn find_by_trakt_vibe(
        &self,
        vibe_keyword: &str,
        limit: u32,
    ) -> Result<Vec<CommunityPick>> {
        let vibe_keyword = validate_query(vibe_keyword, "vibe_keyword")?;
        validate_limit(limit, 1, MAX_DISCOVERY_LIMIT)?;

        let trakt = self.enrichment.trakt();
        let lists = trakt.search_lists(vibe_keyword, VIBE_LISTS_SCANNED).await?;
        debug!(lists = lists.len(), "Trakt lists matched vibe keyword");

        let mut seen = HashSet::new();
        let mut picks = Vec::new();

        for list in &lists {
            let movies = match trakt.list_movies(list).await {
                Ok(movies) => movies,
                Err(e) => {
                    warn!(list_id = list.id, error = %e, "Skipping Trakt list that could not be read");
                    continue;
                }
            };

            for pick in movies {
                let key = match pick.tmdb_id {
                    Some(id) => id.to_string(),
                    None => format!("{}|{:?}", pick.title.to_lowercase(), pick.year),
                };
                if !seen.insert(key) {
                    continue;
                }

                picks.push(pick);
                if picks.len() >= limit as usize {
                    info!(count = picks.len(), "Trakt vibe lists complete");
                    return Ok(picks);
                }
            }
        }

        info!(count = picks.len(), "Trakt vibe lists exhausted");
        Ok(picks)
    }

    /// Trakt movies in a genre, optionally narrowed by a community vibe
    #[instrument(skip(self))]
    pub async fn get_trakt_genre_recommendations(
        &self,
        genre: &str,
        vibe_filter: Option<&str>,
    ) -> Result<Vec<CommunityPick>> {
        let name = validate_query(genre, "genre")?;
        let genre = self.enrichment.genres().resolve(name).ok_or_else(|| {
            CineVibeError::validation_field(format!("Unknown genre '{}'", name), "genre")
        })?;

        let vibe = vibe_filter
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::parse::<CommunityVibe>)
            .transpose()
            .map_err(|e| CineVibeError::validation_field(e, "vibe_filter"))?;

        let (listing, filters) = genre_listing(&genre_slug(genre), vibe, self.current_year());
        Ok(self
            .enrichment
            .trakt()
            .movie_listing(listing, &filters, MAX_LISTING_RESULTS as u32)
            .await?)
    }

    /// Scan discover pages until `limit` candidates pass the rule
    ///
    /// A failed first page is an error. A failure on a later page ends the
    /// scan with whatever was collected.
    async fn discover(
        &self,
        rule: &RuleSet,
        limit: usize,
        exclude: Option<i64>,
    ) -> Result<Vec<TitleSummary>> {
        let current_year = self.current_year();
        let residual = rule.residual();
        let needs_secondary = residual.needs_secondary();

        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for page in 1..=self.max_discover_pages {
            let query = rule.to_discover_query(page, current_year);
            let listing = match self.enrichment.tmdb().discover_movies(&query).await {
                Ok(listing) => listing,
                Err(e) if page == 1 => return Err(e.into()),
                Err(e) => {
                    warn!(rule = %rule.name, page, error = %e, "Discover page failed, returning partial results");
                    break;
                }
            };

            for candidate in listing.results {
                if exclude == Some(candidate.provider_id) || !seen.insert(candidate.provider_id) {
                    continue;
                }

                let accepted = if needs_secondary {
                    match self.enrichment.get_enriched(candidate.provider_id, false).await {
                        Ok(enriched) => residual.matches(&enriched, current_year),
                        Err(e) => {
                            debug!(title_id = candidate.provider_id, error = %e, "Candidate enrichment failed");
                            false
                        }
                    }
                } else {
                    residual.matches(&candidate, current_year)
                };

                if accepted {
                    results.push(candidate.summary());
                    if results.len() >= limit {
                        info!(rule = %rule.name, count = results.len(), "Discovery complete");
                        return Ok(results);
                    }
                }
            }

            if page >= listing.total_pages {
                break;
            }
        }

        info!(rule = %rule.name, count = results.len(), "Discovery exhausted candidates");
        Ok(results)
    }
}

fn summaries(titles: Vec<Title>, max: usize) -> Vec<TitleSummary> {
    titles.iter().take(max).map(Title::summary).collect()
}
