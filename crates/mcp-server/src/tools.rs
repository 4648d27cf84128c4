//! MCP tool implementations
//!
//! Each tool deserializes its arguments, calls one [`VibeService`] operation
//! and renders the outcome as pretty-printed JSON text.

use async_trait::async_trait;
use cinevibe_core::CineVibeError;
use cinevibe_discovery::{
    CommunityVibe, Mood, Personality, RuleKey, TimeContext, VibeModifier, VibeService,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::protocol::{Tool, ToolCallResult};

/// Tool execution trait
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(
        &self,
        arguments: HashMap<String, Value>,
    ) -> Result<ToolCallResult, CineVibeError>;
}

/// Definitions of every tool, in listing order
pub fn definitions() -> Vec<Tool> {
    vec![
        SearchTitlesTool::definition(),
        GetEnrichedDetailsTool::definition(),
        GetEnrichedDetailsWithCommunityTool::definition(),
        FindRatingMismatchesTool::definition(),
        FindByVibeModifierTool::definition(),
        FindByMoodTool::definition(),
        FindByPersonalityTool::definition(),
        AnalyzeTitleVibeTool::definition(),
        SearchTvShowsTool::definition(),
        GetTvDetailsTool::definition(),
        GetTrendingTool::definition(),
        GetCommunityTrendingTool::definition(),
        FindMoviesByTraktVibeTool::definition(),
        GetTraktGenreRecommendationsTool::definition(),
    ]
}

/// Executor for a tool name, or `None` if no such tool exists
pub fn executor(name: &str, service: Arc<VibeService>) -> Option<Box<dyn ToolExecutor>> {
    let executor: Box<dyn ToolExecutor> = match name {
        "search_titles" => Box::new(SearchTitlesTool::new(service)),
        "get_enriched_details" => Box::new(GetEnrichedDetailsTool::new(service)),
        "get_enriched_details_with_community" => {
            Box::new(GetEnrichedDetailsWithCommunityTool::new(service))
        }
        "find_rating_mismatches" => Box::new(FindRatingMismatchesTool::new(service)),
        "find_by_vibe_modifier" => Box::new(FindByVibeModifierTool::new(service)),
        "find_by_mood" => Box::new(FindByMoodTool::new(service)),
        "find_by_personality" => Box::new(FindByPersonalityTool::new(service)),
        "analyze_title_vibe" => Box::new(AnalyzeTitleVibeTool::new(service)),
        "search_tv_shows" => Box::new(SearchTvShowsTool::new(service)),
        "get_tv_details" => Box::new(GetTvDetailsTool::new(service)),
        "get_trending" => Box::new(GetTrendingTool::new(service)),
        "get_community_trending" => Box::new(GetCommunityTrendingTool::new(service)),
        "find_movies_by_trakt_vibe" => Box::new(FindMoviesByTraktVibeTool::new(service)),
        "get_trakt_genre_recommendations" => {
            Box::new(GetTraktGenreRecommendationsTool::new(service))
        }
        _ => return None,
    };
    Some(executor)
}

fn parse_args<T: DeserializeOwned>(arguments: HashMap<String, Value>) -> Result<T, CineVibeError> {
    serde_json::from_value(json!(arguments))
        .map_err(|e| CineVibeError::validation(format!("Invalid arguments: {}", e)))
}

fn json_result<T: Serialize>(value: &T) -> Result<ToolCallResult, CineVibeError> {
    Ok(ToolCallResult::text(serde_json::to_string_pretty(value)?))
}

fn keys<K: RuleKey>() -> Vec<&'static str> {
    K::ALL.iter().map(|k| k.key()).collect()
}

fn default_limit() -> u32 {
    10
}

fn default_min_gap() -> f64 {
    cinevibe_discovery::DEFAULT_MIN_GAP
}

/// Search movies by title
pub struct SearchTitlesTool {
    service: Arc<VibeService>,
}

impl SearchTitlesTool {
    pub fn new(service: Arc<VibeService>) -> Self {
        Self { service }
    }

    pub fn definition() -> Tool {
        Tool {
            name: "search_titles".to_string(),
            description: "Search for movies by title with an optional release year".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Movie title to search for" },
                    "year": { "type": "integer", "description": "Release year" }
                },
                "required": ["query"]
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    year: Option<i32>,
}

#[async_trait]
impl ToolExecutor for SearchTitlesTool {
    #[instrument(skip(self, arguments))]
    async fn execute(
        &self,
        arguments: HashMap<String, Value>,
    ) -> Result<ToolCallResult, CineVibeError> {
        let args: SearchArgs = parse_args(arguments)?;
        info!(query = %args.query, year = ?args.year, "Searching titles");

        let results = self.service.search_titles(&args.query, args.year).await?;
        json_result(&json!({
            "query": args.query,
            "results_count": results.len(),
            "results": results
        }))
    }
}

/// Search TV shows by name
pub struct SearchTvShowsTool {
    service: Arc<VibeService>,
}

impl SearchTvShowsTool {
    pub fn new(service: Arc<VibeService>) -> Self {
        Self { service }
    }

    pub fn definition() -> Tool {
        Tool {
            name: "search_tv_shows".to_string(),
            description: "Search for TV shows by name with an optional first-air year".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "TV show name to search for" },
                    "year": { "type": "integer", "description": "First air year" }
                },
                "required": ["query"]
            }),
        }
    }
}

#[async_trait]
impl ToolExecutor for SearchTvShowsTool {
    #[instrument(skip(self, arguments))]
    async fn execute(
        &self,
        arguments: HashMap<String, Value>,
    ) -> Result<ToolCallResult, CineVibeError> {
        let args: SearchArgs = parse_args(arguments)?;
        info!(query = %args.query, "Searching TV shows");

        let results = self.service.search_tv_shows(&args.query, args.year).await?;
        json_result(&json!({
            "query": args.query,
            "results_count": results.len(),
            "results": results
        }))
    }
}

#[derive(Debug, Deserialize)]
struct TitleIdArgs {
    title_id: i64,
}

fn title_id_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "title_id": { "type": "integer", "description": description }
        },
        "required": ["title_id"]
    })
}

/// Movie details merged from every provider
pub struct GetEnrichedDetailsTool {
    service: Arc<VibeService>,
}

impl GetEnrichedDetailsTool {
    pub fn new(service: Arc<VibeService>) -> Self {
        Self { service }
    }

    pub fn definition() -> Tool {
        Tool {
            name: "get_enriched_details".to_string(),
            description: "Get movie details with ratings from TMDb, IMDb, Rotten Tomatoes and Metacritic"
                .to_string(),
            input_schema: title_id_schema("TMDb movie id"),
        }
    }
}

#[async_trait]
impl ToolExecutor for GetEnrichedDetailsTool {
    #[instrument(skip(self, arguments))]
    async fn execute(
        &self,
        arguments: HashMap<String, Value>,
    ) -> Result<ToolCallResult, CineVibeError> {
        let args: TitleIdArgs = parse_args(arguments)?;
        let title = self.service.get_enriched_details(args.title_id).await?;
        json_result(&title)
    }
}

/// Enriched details plus Trakt community data
pub struct GetEnrichedDetailsWithCommunityTool {
    service: Arc<VibeService>,
}

impl GetEnrichedDetailsWithCommunityTool {
    pub fn new(service: Arc<VibeService>) -> Self {
        Self { service }
    }

    pub fn definition() -> Tool {
        Tool {
            name: "get_enriched_details_with_community".to_string(),
            description: "Get enriched movie details including Trakt watcher stats, comment sentiment and related titles"
                .to_string(),
            input_schema: title_id_schema("TMDb movie id"),
        }
    }
}

#[async_trait]
impl ToolExecutor for GetEnrichedDetailsWithCommunityTool {
    #[instrument(skip(self, arguments))]
    async fn execute(
        &self,
        arguments: HashMap<String, Value>,
    ) -> Result<ToolCallResult, CineVibeError> {
        let args: TitleIdArgs = parse_args(arguments)?;
        let title = self
            .service
            .get_enriched_details_with_community(args.title_id)
            .await?;
        json_result(&title)
    }
}

/// Critic/audience disagreements among search results
pub struct FindRatingMismatchesTool {
    service: Arc<VibeService>,
}

impl FindRatingMismatchesTool {
    pub fn new(service: Arc<VibeService>) -> Self {
        Self { service }
    }

    pub fn definition() -> Tool {
        Tool {
            name: "find_rating_mismatches".to_string(),
            description: "Find movies where critics and audiences disagree; a large gap often signals a distinctive vibe"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search query for candidate movies" },
                    "min_gap": {
                        "type": "number",
                        "description": "Minimum gap on a 0-10 scale",
                        "default": 2.0,
                        "minimum": 1.0,
                        "maximum": 5.0
                    }
                },
                "required": ["query"]
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MismatchArgs {
    query: String,
    #[serde(default = "default_min_gap")]
    min_gap: f64,
}

#[async_trait]
impl ToolExecutor for FindRatingMismatchesTool {
    #[instrument(skip(self, arguments))]
    async fn execute(
        &self,
        arguments: HashMap<String, Value>,
    ) -> Result<ToolCallResult, CineVibeError> {
        let args: MismatchArgs = parse_args(arguments)?;
        let mismatches = self
            .service
            .find_rating_mismatches(&args.query, args.min_gap)
            .await?;

        json_result(&json!({
            "query": args.query,
            "min_gap": args.min_gap,
            "mismatches_found": mismatches.len(),
            "mismatches": mismatches
        }))
    }
}

/// Titles like a reference, shifted by a modifier
pub struct FindByVibeModifierTool {
    service: Arc<VibeService>,
}

impl FindByVibeModifierTool {
    pub fn new(service: Arc<VibeService>) -> Self {
        Self { service }
    }

    pub fn definition() -> Tool {
        Tool {
            name: "find_by_vibe_modifier".to_string(),
            description: "Find movies with a similar vibe to a reference movie, adjusted by a modifier"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "reference_title": { "type": "string", "description": "Movie to use as reference" },
                    "modifier": {
                        "type": "string",
                        "description": "How the results should differ from the reference",
                        "enum": keys::<VibeModifier>()
                    },
                    "limit": { "type": "integer", "default": 10, "minimum": 1, "maximum": 20 }
                },
                "required": ["reference_title", "modifier"]
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VibeModifierArgs {
    reference_title: String,
    modifier: String,
    #[serde(default = "default_limit")]
    limit: u32,
}

#[async_trait]
impl ToolExecutor for FindByVibeModifierTool {
    #[instrument(skip(self, arguments))]
    async fn execute(
        &self,
        arguments: HashMap<String, Value>,
    ) -> Result<ToolCallResult, CineVibeError> {
        let args: VibeModifierArgs = parse_args(arguments)?;
        let results = self
            .service
            .find_by_vibe_modifier(&args.reference_title, &args.modifier, args.limit)
            .await?;

        json_result(&json!({
            "reference_title": args.reference_title,
            "modifier": args.modifier,
            "results_count": results.len(),
            "results": results
        }))
    }
}

/// Mood-based discovery
pub struct FindByMoodTool {
    service: Arc<VibeService>,
}

impl FindByMoodTool {
    pub fn new(service: Arc<VibeService>) -> Self {
        Self { service }
    }

    pub fn definition() -> Tool {
        Tool {
            name: "find_by_mood".to_string(),
            description: "Get movie recommendations for a mood and optional time of day".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "mood": { "type": "string", "enum": keys::<Mood>() },
                    "time_context": { "type": "string", "enum": keys::<TimeContext>() },
                    "limit": { "type": "integer", "default": 10, "minimum": 1, "maximum": 20 }
                },
                "required": ["mood"]
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MoodArgs {
    mood: String,
    time_context: Option<String>,
    #[serde(default = "default_limit")]
    limit: u32,
}

#[async_trait]
impl ToolExecutor for FindByMoodTool {
    #[instrument(skip(self, arguments))]
    async fn execute(
        &self,
        arguments: HashMap<String, Value>,
    ) -> Result<ToolCallResult, CineVibeError> {
        let args: MoodArgs = parse_args(arguments)?;
        let results = self
            .service
            .find_by_mood(&args.mood, args.time_context.as_deref(), args.limit)
            .await?;

        json_result(&json!({
            "mood": args.mood,
            "time_context": args.time_context,
            "results_count": results.len(),
            "results": results
        }))
    }
}

/// Personality-archetype discovery
pub struct FindByPersonalityTool {
    service: Arc<VibeService>,
}

impl FindByPersonalityTool {
    pub fn new(service: Arc<VibeService>) -> Self {
        Self { service }
    }

    pub fn definition() -> Tool {
        Tool {
            name: "find_by_personality".to_string(),
            description: "Find movies with a specific critic/audience relationship pattern".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "personality": { "type": "string", "enum": keys::<Personality>() },
                    "genre_filter": { "type": "string", "description": "Genre every result must have" }
                },
                "required": ["personality"]
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PersonalityArgs {
    personality: String,
    genre_filter: Option<String>,
}

#[async_trait]
impl ToolExecutor for FindByPersonalityTool {
    #[instrument(skip(self, arguments))]
    async fn execute(
        &self,
        arguments: HashMap<String, Value>,
    ) -> Result<ToolCallResult, CineVibeError> {
        let args: PersonalityArgs = parse_args(arguments)?;
        let results = self
            .service
            .find_by_personality(&args.personality, args.genre_filter.as_deref())
            .await?;

        json_result(&json!({
            "personality": args.personality,
            "genre_filter": args.genre_filter,
            "results_count": results.len(),
            "results": results
        }))
    }
}

/// Vibe breakdown of one movie
pub struct AnalyzeTitleVibeTool {
    service: Arc<VibeService>,
}

impl AnalyzeTitleVibeTool {
    pub fn new(service: Arc<VibeService>) -> Self {
        Self { service }
    }

    pub fn definition() -> Tool {
        Tool {
            name: "analyze_title_vibe".to_string(),
            description: "Analyze a movie's vibe: tags, mood profile, best viewing time, accessibility and prestige"
                .to_string(),
            input_schema: title_id_schema("TMDb movie id"),
        }
    }
}

#[async_trait]
impl ToolExecutor for AnalyzeTitleVibeTool {
    #[instrument(skip(self, arguments))]
    async fn execute(
        &self,
        arguments: HashMap<String, Value>,
    ) -> Result<ToolCallResult, CineVibeError> {
        let args: TitleIdArgs = parse_args(arguments)?;
        let analysis = self.service.analyze_title_vibe(args.title_id).await?;
        json_result(&analysis)
    }
}

/// TV show details
pub struct GetTvDetailsTool {
    service: Arc<VibeService>,
}

impl GetTvDetailsTool {
    pub fn new(service: Arc<VibeService>) -> Self {
        Self { service }
    }

    pub fn definition() -> Tool {
        Tool {
            name: "get_tv_details".to_string(),
            description: "Get details about a TV show including seasons, episodes and creators"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "tv_id": { "type": "integer", "description": "TMDb TV show id" }
                },
                "required": ["tv_id"]
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TvIdArgs {
    tv_id: i64,
}

#[async_trait]
impl ToolExecutor for GetTvDetailsTool {
    #[instrument(skip(self, arguments))]
    async fn execute(
        &self,
        arguments: HashMap<String, Value>,
    ) -> Result<ToolCallResult, CineVibeError> {
        let args: TvIdArgs = parse_args(arguments)?;
        let title = self.service.get_tv_details(args.tv_id).await?;
        json_result(&title)
    }
}

/// TMDb trending listing
pub struct GetTrendingTool {
    service: Arc<VibeService>,
}

impl GetTrendingTool {
    pub fn new(service: Arc<VibeService>) -> Self {
        Self { service }
    }

    pub fn definition() -> Tool {
        Tool {
            name: "get_trending".to_string(),
            description: "Get trending movies or TV shows".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "media_type": { "type": "string", "enum": ["movie", "tv", "all"], "default": "movie" },
                    "time_window": { "type": "string", "enum": ["day", "week"], "default": "week" }
                }
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TrendingArgs {
    #[serde(default = "default_trending_media")]
    media_type: String,
    #[serde(default = "default_time_window")]
    time_window: String,
}

fn default_trending_media() -> String {
    "movie".to_string()
}

fn default_time_window() -> String {
    "week".to_string()
}

#[async_trait]
impl ToolExecutor for GetTrendingTool {
    #[instrument(skip(self, arguments))]
    async fn execute(
        &self,
        arguments: HashMap<String, Value>,
    ) -> Result<ToolCallResult, CineVibeError> {
        let args: TrendingArgs = parse_args(arguments)?;
        let results = self
            .service
            .get_trending(&args.media_type, &args.time_window)
            .await?;

        json_result(&json!({
            "media_type": args.media_type,
            "time_window": args.time_window,
            "results": results
        }))
    }
}

/// Trakt watcher-based trending listing
pub struct GetCommunityTrendingTool {
    service: Arc<VibeService>,
}

impl GetCommunityTrendingTool {
    pub fn new(service: Arc<VibeService>) -> Self {
        Self { service }
    }

    pub fn definition() -> Tool {
        Tool {
            name: "get_community_trending".to_string(),
            description: "Get what Trakt users are watching right now".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "media_type": { "type": "string", "enum": ["movies", "shows"], "default": "movies" },
                    "limit": { "type": "integer", "default": 10, "minimum": 1, "maximum": 20 }
                }
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CommunityTrendingArgs {
    #[serde(default = "default_community_media")]
    media_type: String,
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_community_media() -> String {
    "movies".to_string()
}

#[async_trait]
impl ToolExecutor for GetCommunityTrendingTool {
    #[instrument(skip(self, arguments))]
    async fn execute(
        &self,
        arguments: HashMap<String, Value>,
    ) -> Result<ToolCallResult, CineVibeError> {
        let args: CommunityTrendingArgs = parse_args(arguments)?;
        let entries = self
            .service
            .get_community_trending(&args.media_type, args.limit)
            .await?;

        json_result(&json!({
            "media_type": args.media_type,
            "results": entries
        }))
    }
}

/// Movies from Trakt user lists named after a vibe
pub struct FindMoviesByTraktVibeTool {
    service: Arc<VibeService>,
}

impl FindMoviesByTraktVibeTool {
    pub fn new(service: Arc<VibeService>) -> Self {
        Self { service }
    }

    pub fn definition() -> Tool {
        Tool {
            name: "find_movies_by_trakt_vibe".to_string(),
            description: "Find movies from Trakt user lists that match a vibe keyword".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "vibe_keyword": {
                        "type": "string",
                        "description": "Vibe keyword such as 'cozy', 'dark', 'uplifting' or 'mind-bending'"
                    },
                    "limit": { "type": "integer", "default": 10, "minimum": 1, "maximum": 20 }
                },
                "required": ["vibe_keyword"]
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TraktVibeArgs {
    vibe_keyword: String,
    #[serde(default = "default_limit")]
    limit: u32,
}

#[async_trait]
impl ToolExecutor for FindMoviesByTraktVibeTool {
    #[instrument(skip(self, arguments))]
    async fn execute(
        &self,
        arguments: HashMap<String, Value>,
    ) -> Result<ToolCallResult, CineVibeError> {
        let args: TraktVibeArgs = parse_args(arguments)?;
        info!(vibe_keyword = %args.vibe_keyword, limit = args.limit, "Reading Trakt vibe lists");

        let picks = self
            .service
            .find_by_trakt_vibe(&args.vibe_keyword, args.limit)
            .await?;

        json_result(&json!({
            "vibe_keyword": args.vibe_keyword,
            "results_count": picks.len(),
            "results": picks
        }))
    }
}

/// Trakt genre listing with an optional community vibe
pub struct GetTraktGenreRecommendationsTool {
    service: Arc<VibeService>,
}

impl GetTraktGenreRecommendationsTool {
    pub fn new(service: Arc<VibeService>) -> Self {
        Self { service }
    }

    pub fn definition() -> Tool {
        let vibes: Vec<&str> = CommunityVibe::ALL.iter().map(|v| v.key()).collect();
        Tool {
            name: "get_trakt_genre_recommendations".to_string(),
            description: "Get movie recommendations from Trakt for a genre with an optional vibe filter"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "genre": { "type": "string", "description": "Genre such as 'Action', 'Drama' or 'sci-fi'" },
                    "vibe_filter": { "type": "string", "enum": vibes }
                },
                "required": ["genre"]
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TraktGenreArgs {
    genre: String,
    vibe_filter: Option<String>,
}

#[async_trait]
impl ToolExecutor for GetTraktGenreRecommendationsTool {
    #[instrument(skip(self, arguments))]
    async fn execute(
        &self,
        arguments: HashMap<String, Value>,
    ) -> Result<ToolCallResult, CineVibeError> {
        let args: TraktGenreArgs = parse_args(arguments)?;
        let picks = self
            .service
            .get_trakt_genre_recommendations(&args.genre, args.vibe_filter.as_deref())
            .await?;

        json_result(&json!({
            "genre": args.genre,
            "vibe_filter": args.vibe_filter,
            "results": picks
        }))
    }
}
