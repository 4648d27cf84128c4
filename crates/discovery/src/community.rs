//! Trakt genre listings narrowed by a vibe
//!
//! Trakt filters on certifications, runtimes, years and third-party ratings
//! server-side, so each vibe is a listing choice plus a filter set.

use cinevibe_ingestion::aggregator::TraktMovieListing;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityVibe {
    Cozy,
    Intense,
    Accessible,
    Cult,
}

impl CommunityVibe {
    pub const ALL: [CommunityVibe; 4] = [Self::Cozy, Self::Intense, Self::Accessible, Self::Cult];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Cozy => "cozy",
            Self::Intense => "intense",
            Self::Accessible => "accessible",
            Self::Cult => "cult",
        }
    }

    fn listing(&self) -> TraktMovieListing {
        match self {
            Self::Cozy | Self::Accessible => TraktMovieListing::Popular,
            Self::Intense => TraktMovieListing::Trending,
            Self::Cult => TraktMovieListing::Watched,
        }
    }

    fn filters(&self, current_year: i32) -> Vec<(&'static str, String)> {
        match self {
            Self::Cozy => vec![
                ("certifications", "g,pg,pg-13".to_string()),
                ("runtimes", "0-120".to_string()),
            ],
            Self::Intense => vec![
                ("certifications", "r".to_string()),
                ("imdb_ratings", "6.5-10.0".to_string()),
            ],
            Self::Accessible => vec![
                ("runtimes", "0-130".to_string()),
                ("imdb_ratings", "6.5-10.0".to_string()),
            ],
            // Mirrors the cult_classic personality
            Self::Cult => vec![
                ("years", format!("1900-{}", current_year - 15)),
                ("rt_meters", "0-60".to_string()),
                ("imdb_ratings", "7.0-10.0".to_string()),
            ],
        }
    }
}

impl fmt::Display for CommunityVibe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CommunityVibe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.key() == normalized)
            .ok_or_else(|| {
                format!(
                    "vibe_filter must be one of cozy, intense, accessible or cult, got '{}'",
                    s
                )
            })
    }
}

/// Listing and filters for a genre, optionally narrowed by a vibe
///
/// Without a vibe the genre's popular listing is read unfiltered.
pub fn genre_listing(
    genre_slug: &str,
    vibe: Option<CommunityVibe>,
    current_year: i32,
) -> (TraktMovieListing, Vec<(&'static str, String)>) {
    let mut filters = vec![("genres", genre_slug.to_string())];
    match vibe {
        Some(vibe) => {
            filters.extend(vibe.filters(current_year));
            (vibe.listing(), filters)
        }
        None => (TraktMovieListing::Popular, filters),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(filters: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        filters
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_parse() {
        assert_eq!("Cozy".parse::<CommunityVibe>(), Ok(CommunityVibe::Cozy));
        assert_eq!(" cult ".parse::<CommunityVibe>(), Ok(CommunityVibe::Cult));

        let err = "grounded".parse::<CommunityVibe>().unwrap_err();
        assert!(err.contains("grounded"));
    }

    #[test]
    fn test_plain_genre_listing() {
        let (listing, filters) = genre_listing("drama", None, 2024);
        assert_eq!(listing, TraktMovieListing::Popular);
        assert_eq!(filters, vec![("genres", "drama".to_string())]);
    }

    #[test]
    fn test_cult_listing_tracks_current_year() {
        let (listing, filters) = genre_listing("horror", Some(CommunityVibe::Cult), 2024);
        assert_eq!(listing, TraktMovieListing::Watched);
        assert_eq!(param(&filters, "genres"), Some("horror"));
        assert_eq!(param(&filters, "years"), Some("1900-2009"));
        assert_eq!(param(&filters, "rt_meters"), Some("0-60"));
    }

    #[test]
    fn test_every_vibe_keeps_the_genre() {
        for vibe in CommunityVibe::ALL {
            let (_, filters) = genre_listing("comedy", Some(vibe), 2024);
            assert_eq!(param(&filters, "genres"), Some("comedy"), "{}", vibe);
            assert!(filters.len() > 1, "{}", vibe);
        }
    }
}
