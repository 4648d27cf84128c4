//! Community data sourced from Trakt

use serde::{Deserialize, Serialize};

/// Aggregate community counters for one title
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityStats {
    pub watchers: u64,
    pub plays: u64,
    pub collectors: u64,
    pub comments: u64,
    pub lists: u64,
    pub votes: u64,
}

/// Keyword-derived summary of user comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentiment {
    /// "positive", "negative", "mixed" or "neutral"
    pub label: String,
    /// Short phrase describing how viewers talk about the title
    pub user_vibe: String,
    pub common_themes: Vec<String>,
    pub sample_size: usize,
}

/// A title the community links to the requested one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedTitle {
    pub title: String,
    pub year: Option<i32>,
    pub tmdb_id: Option<i64>,
}

/// Every part is fetched independently and may be missing on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityData {
    pub stats: Option<CommunityStats>,
    pub sentiment: Option<Sentiment>,
    pub related: Vec<RelatedTitle>,
}

impl CommunityData {
    pub fn is_empty(&self) -> bool {
        self.stats.is_none() && self.sentiment.is_none() && self.related.is_empty()
    }
}

/// One row of the community trending list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityTrendingEntry {
    pub watchers: u64,
    pub title: String,
    pub year: Option<i32>,
    pub tmdb_id: Option<i64>,
    pub imdb_id: Option<String>,
}

/// A movie picked from a Trakt list or genre listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityPick {
    pub title: String,
    pub year: Option<i32>,
    pub tmdb_id: Option<i64>,
    pub imdb_id: Option<String>,
    /// Name of the user list the movie came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_list: Option<String>,
}
