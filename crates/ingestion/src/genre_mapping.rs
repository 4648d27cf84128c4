//! Genre mapping to the canonical (TMDb) taxonomy
//!
//! Resolution order:
//! 1. Exact name match (case-insensitive)
//! 2. Provider-specific alias mapping (OMDb uses "Sci-Fi", "Musical", ...)
//! 3. Fuzzy matching fallback (>= 0.8 normalized Levenshtein similarity)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strsim::normalized_levenshtein;

/// Canonical genre taxonomy, keyed by TMDb genre id
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CanonicalGenre {
    Action,
    Adventure,
    Animation,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Family,
    Fantasy,
    History,
    Horror,
    Music,
    Mystery,
    Romance,
    ScienceFiction,
    TvMovie,
    Thriller,
    War,
    Western,
}

impl CanonicalGenre {
    pub const ALL: [CanonicalGenre; 19] = [
        Self::Action,
        Self::Adventure,
        Self::Animation,
        Self::Comedy,
        Self::Crime,
        Self::Documentary,
        Self::Drama,
        Self::Family,
        Self::Fantasy,
        Self::History,
        Self::Horror,
        Self::Music,
        Self::Mystery,
        Self::Romance,
        Self::ScienceFiction,
        Self::TvMovie,
        Self::Thriller,
        Self::War,
        Self::Western,
    ];

    /// Get string representation (TMDb display name)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Adventure => "Adventure",
            Self::Animation => "Animation",
            Self::Comedy => "Comedy",
            Self::Crime => "Crime",
            Self::Documentary => "Documentary",
            Self::Drama => "Drama",
            Self::Family => "Family",
            Self::Fantasy => "Fantasy",
            Self::History => "History",
            Self::Horror => "Horror",
            Self::Music => "Music",
            Self::Mystery => "Mystery",
            Self::Romance => "Romance",
            Self::ScienceFiction => "Science Fiction",
            Self::TvMovie => "TV Movie",
            Self::Thriller => "Thriller",
            Self::War => "War",
            Self::Western => "Western",
        }
    }

    /// TMDb movie genre id
    pub fn tmdb_id(&self) -> u32 {
        match self {
            Self::Action => 28,
            Self::Adventure => 12,
            Self::Animation => 16,
            Self::Comedy => 35,
            Self::Crime => 80,
            Self::Documentary => 99,
            Self::Drama => 18,
            Self::Family => 10751,
            Self::Fantasy => 14,
            Self::History => 36,
            Self::Horror => 27,
            Self::Music => 10402,
            Self::Mystery => 9648,
            Self::Romance => 10749,
            Self::ScienceFiction => 878,
            Self::TvMovie => 10770,
            Self::Thriller => 53,
            Self::War => 10752,
            Self::Western => 37,
        }
    }

    pub fn from_tmdb_id(id: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.tmdb_id() == id)
    }

    /// Exact, case-insensitive lookup by display name
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.as_str().eq_ignore_ascii_case(name))
    }
}

/// Genre mapper for converting provider-specific genre names to the canonical taxonomy
pub struct GenreMapper {
    // Provider-specific aliases, keys lowercased
    provider_mappings: HashMap<&'static str, HashMap<&'static str, Vec<CanonicalGenre>>>,
    fuzzy_threshold: f64,
}

impl GenreMapper {
    /// Create a new genre mapper with default mappings
    pub fn new() -> Self {
        let mut mapper = Self {
            provider_mappings: HashMap::new(),
            fuzzy_threshold: 0.8,
        };

        mapper.init_omdb_mappings();
        mapper.init_user_mappings();

        mapper
    }

    /// Map genre names from a provider onto canonical names
    ///
    /// Order of first appearance is kept; duplicates are dropped. Names that
    /// cannot be resolved are skipped.
    pub fn map_genres(&self, genres: &[String], provider: &str) -> Vec<String> {
        let mut canonical: Vec<String> = Vec::new();

        for genre in genres {
            for mapped in self.map_single_genre(genre, provider) {
                let name = mapped.as_str().to_string();
                if !canonical.contains(&name) {
                    canonical.push(name);
                }
            }
        }

        canonical
    }

    /// Split an OMDb comma-separated genre string ("Action, Sci-Fi") and map it
    pub fn map_omdb_genre_list(&self, raw: &str) -> Vec<String> {
        let parts: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        self.map_genres(&parts, "omdb")
    }

    /// Resolve a single user-supplied genre name, tolerating spelling variants
    pub fn resolve(&self, name: &str) -> Option<CanonicalGenre> {
        self.map_single_genre(name, "user").into_iter().next()
    }

    /// Convert TMDb genre ids into canonical names, skipping unknown ids
    pub fn names_from_tmdb_ids(ids: &[u32]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| CanonicalGenre::from_tmdb_id(*id))
            .map(|g| g.as_str().to_string())
            .collect()
    }

    fn map_single_genre(&self, genre: &str, provider: &str) -> Vec<CanonicalGenre> {
        if let Some(exact) = CanonicalGenre::from_name(genre) {
            return vec![exact];
        }

        let normalized = genre.trim().to_lowercase();

        if let Some(provider_map) = self.provider_mappings.get(provider) {
            if let Some(canonical) = provider_map.get(normalized.as_str()) {
                return canonical.clone();
            }
        }

        self.fuzzy_match_genre(&normalized).into_iter().collect()
    }

    /// Fuzzy match genre against the canonical taxonomy
    fn fuzzy_match_genre(&self, genre: &str) -> Option<CanonicalGenre> {
        let mut best_match: Option<CanonicalGenre> = None;
        let mut best_score = 0.0;

        for canonical in CanonicalGenre::ALL {
            let similarity = normalized_levenshtein(genre, &canonical.as_str().to_lowercase());

            if similarity > best_score && similarity >= self.fuzzy_threshold {
                best_score = similarity;
                best_match = Some(canonical);
            }
        }

        best_match
    }

    /// OMDb genre names
    fn init_omdb_mappings(&mut self) {
        let mut mappings = HashMap::new();

        mappings.insert("sci-fi", vec![CanonicalGenre::ScienceFiction]);
        mappings.insert("musical", vec![CanonicalGenre::Music]);
        mappings.insert("biography", vec![CanonicalGenre::History]);
        mappings.insert("film-noir", vec![CanonicalGenre::Crime]);
        mappings.insert("sport", vec![CanonicalGenre::Drama]);
        mappings.insert("short", vec![]);
        mappings.insert("news", vec![CanonicalGenre::Documentary]);

        self.provider_mappings.insert("omdb", mappings);
    }

    /// Free-text genre names typed by users
    fn init_user_mappings(&mut self) {
        let mut mappings = HashMap::new();

        mappings.insert("sci-fi", vec![CanonicalGenre::ScienceFiction]);
        mappings.insert("scifi", vec![CanonicalGenre::ScienceFiction]);
        mappings.insert("sf", vec![CanonicalGenre::ScienceFiction]);
        mappings.insert("romantic", vec![CanonicalGenre::Romance]);
        mappings.insert("romcom", vec![CanonicalGenre::Romance]);
        mappings.insert("animated", vec![CanonicalGenre::Animation]);
        mappings.insert("anime", vec![CanonicalGenre::Animation]);
        mappings.insert("kids", vec![CanonicalGenre::Family]);
        mappings.insert("musical", vec![CanonicalGenre::Music]);
        mappings.insert("historical", vec![CanonicalGenre::History]);
        mappings.insert("suspense", vec![CanonicalGenre::Thriller]);
        mappings.insert("documentaries", vec![CanonicalGenre::Documentary]);
        mappings.insert("scary", vec![CanonicalGenre::Horror]);

        self.provider_mappings.insert("user", mappings);
    }
}

impl Default for GenreMapper {
    fn default() -> Self {
        Self::new()
    }
}
