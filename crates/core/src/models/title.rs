//! Title models
//!
//! A [`Title`] is assembled field by field from the primary provider (TMDb),
//! optionally filled in from the secondary provider (OMDb), and optionally
//! carries community data (Trakt).

use super::community::CommunityData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum overview length in listings before truncation
pub const OVERVIEW_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

/// Ratings from every source, each independently optional
///
/// `canonical` and `audience` are on a 0-10 scale; the critic scores are
/// 0-100 percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSet {
    /// TMDb vote average
    pub canonical: Option<f64>,
    /// IMDb rating as reported by OMDb
    pub audience: Option<f64>,
    /// Rotten Tomatoes approval
    pub critic_percentage: Option<f64>,
    /// Metacritic score
    pub critic_weighted: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
    pub profile_url: Option<String>,
}

/// Lightweight identity used inside mismatch and analysis results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRef {
    pub id: i64,
    pub name: String,
    pub year: Option<i32>,
}

/// Fully enriched title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    /// TMDb id
    pub provider_id: i64,
    /// IMDb id once resolved
    pub external_id: Option<String>,
    pub media_type: MediaType,
    pub name: String,
    pub tagline: Option<String>,
    pub release_date: Option<String>,
    pub year: Option<i32>,
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<String>,
    pub production_companies: Vec<String>,
    pub overview: Option<String>,
    pub detailed_plot: Option<String>,
    pub awards: Option<String>,
    pub rated: Option<String>,
    pub writer: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub box_office: Option<String>,
    pub budget: Option<u64>,
    pub revenue: Option<u64>,
    pub vote_count: Option<u64>,
    pub popularity: Option<f64>,
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_seasons: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_episodes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub cast: Vec<CastMember>,
    /// Crew names grouped by job
    pub crew: BTreeMap<String, Vec<String>>,
    pub ratings: RatingSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community: Option<CommunityData>,
    pub rating_analysis: Option<String>,
}

impl Title {
    /// Create a title with only its identity set
    pub fn new(provider_id: i64, name: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            provider_id,
            external_id: None,
            media_type,
            name: name.into(),
            tagline: None,
            release_date: None,
            year: None,
            runtime_minutes: None,
            genres: Vec::new(),
            production_companies: Vec::new(),
            overview: None,
            detailed_plot: None,
            awards: None,
            rated: None,
            writer: None,
            language: None,
            country: None,
            box_office: None,
            budget: None,
            revenue: None,
            vote_count: None,
            popularity: None,
            poster_url: None,
            number_of_seasons: None,
            number_of_episodes: None,
            status: None,
            cast: Vec::new(),
            crew: BTreeMap::new(),
            ratings: RatingSet::default(),
            community: None,
            rating_analysis: None,
        }
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    pub fn has_any_genre(&self, genres: &[&str]) -> bool {
        genres.iter().any(|g| self.has_genre(g))
    }

    /// "2h 28m" style runtime
    pub fn runtime_formatted(&self) -> Option<String> {
        self.runtime_minutes.map(|minutes| {
            let (hours, rest) = (minutes / 60, minutes % 60);
            if hours > 0 {
                format!("{}h {}m", hours, rest)
            } else {
                format!("{}m", rest)
            }
        })
    }

    pub fn title_ref(&self) -> TitleRef {
        TitleRef {
            id: self.provider_id,
            name: self.name.clone(),
            year: self.year,
        }
    }

    pub fn summary(&self) -> TitleSummary {
        TitleSummary {
            id: self.provider_id,
            name: self.name.clone(),
            media_type: self.media_type,
            release_date: self.release_date.clone(),
            year: self.year,
            overview: self.overview.as_deref().map(truncate_overview),
            rating: self.ratings.canonical,
            vote_count: self.vote_count,
            poster_url: self.poster_url.clone(),
            genres: self.genres.clone(),
        }
    }
}

/// Listing entry returned by search, trending and discovery operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSummary {
    pub id: i64,
    pub name: String,
    pub media_type: MediaType,
    pub release_date: Option<String>,
    pub year: Option<i32>,
    pub overview: Option<String>,
    /// Canonical rating
    pub rating: Option<f64>,
    pub vote_count: Option<u64>,
    pub poster_url: Option<String>,
    pub genres: Vec<String>,
}

/// Cut an overview down to [`OVERVIEW_PREVIEW_CHARS`] characters followed by "..."
///
/// Shorter overviews are returned unchanged.
pub fn truncate_overview(text: &str) -> String {
    if text.chars().count() <= OVERVIEW_PREVIEW_CHARS {
        return text.to_string();
    }

    let cut: String = text.chars().take(OVERVIEW_PREVIEW_CHARS).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_overview() {
        assert_eq!(truncate_overview("short"), "short");

        let long = "x".repeat(250);
        let cut = truncate_overview(&long);
        assert_eq!(cut.len(), OVERVIEW_PREVIEW_CHARS + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_truncate_overview_multibyte() {
        let long = "é".repeat(300);
        let cut = truncate_overview(&long);
        assert_eq!(cut.chars().count(), OVERVIEW_PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_runtime_formatted() {
        let mut title = Title::new(27205, "Inception", MediaType::Movie);
        assert_eq!(title.runtime_formatted(), None);

        title.runtime_minutes = Some(148);
        assert_eq!(title.runtime_formatted().as_deref(), Some("2h 28m"));

        title.runtime_minutes = Some(45);
        assert_eq!(title.runtime_formatted().as_deref(), Some("45m"));
    }

    #[test]
    fn test_summary_uses_canonical_rating() {
        let mut title = Title::new(27205, "Inception", MediaType::Movie);
        title.ratings.canonical = Some(8.4);
        title.ratings.audience = Some(8.8);
        title.genres = vec!["Action".to_string(), "Science Fiction".to_string()];

        let summary = title.summary();
        assert_eq!(summary.rating, Some(8.4));
        assert_eq!(summary.genres.len(), 2);
        assert!(title.has_genre("Action"));
        assert!(!title.has_genre("action"));
    }

    #[test]
    fn test_media_type_serialization() {
        assert_eq!(serde_json::to_string(&MediaType::Tv).unwrap(), "\"tv\"");
        assert_eq!(MediaType::Movie.as_str(), "movie");
    }
}
