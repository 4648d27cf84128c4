//! Validation utilities for tool arguments
//!
//! Every function returns a `ValidationError` carrying the offending field so
//! the MCP shell can surface it as an invalid-params response.

use crate::error::CineVibeError;
use once_cell::sync::Lazy;
use regex::Regex;

/// IMDb ID regex pattern (e.g., tt0111161)
pub static IMDB_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^tt\d{7,8}$").expect("Failed to compile IMDb ID regex"));

pub const MAX_QUERY_LENGTH: usize = 200;

/// Validate IMDb ID format
///
/// # Examples
///
/// ```
/// use cinevibe_core::validation::validate_imdb_id;
///
/// assert!(validate_imdb_id("tt1375666").is_ok());
/// assert!(validate_imdb_id("1375666").is_err());
/// ```
pub fn validate_imdb_id(id: &str) -> Result<(), CineVibeError> {
    if IMDB_ID_REGEX.is_match(id) {
        Ok(())
    } else {
        Err(CineVibeError::validation_field(
            "Invalid IMDb ID format (expected tt followed by 7-8 digits)",
            "imdb_id",
        ))
    }
}

/// Validate a free-text search query and return it trimmed
///
/// # Examples
///
/// ```
/// use cinevibe_core::validation::validate_query;
///
/// assert_eq!(validate_query("  Inception ", "query").unwrap(), "Inception");
/// assert!(validate_query("   ", "query").is_err());
/// ```
pub fn validate_query<'a>(query: &'a str, field: &str) -> Result<&'a str, CineVibeError> {
    let trimmed = query.trim();

    if trimmed.is_empty() {
        return Err(CineVibeError::validation_field(
            format!("Field '{}' must not be empty", field),
            field,
        ));
    }

    if trimmed.chars().count() > MAX_QUERY_LENGTH {
        return Err(CineVibeError::validation_field(
            format!(
                "Field '{}' must be at most {} characters",
                field, MAX_QUERY_LENGTH
            ),
            field,
        ));
    }

    Ok(trimmed)
}

/// Validate release year is within reasonable bounds
///
/// # Examples
///
/// ```
/// use cinevibe_core::validation::validate_release_year;
///
/// assert!(validate_release_year(2010).is_ok());
/// assert!(validate_release_year(1800).is_err());
/// ```
pub fn validate_release_year(year: i32) -> Result<(), CineVibeError> {
    if (1874..=2100).contains(&year) {
        Ok(())
    } else {
        Err(CineVibeError::validation_field(
            format!("Release year must be between 1874 and 2100, got {}", year),
            "year",
        ))
    }
}

/// Validate a result limit (inclusive bounds)
pub fn validate_limit(limit: u32, min: u32, max: u32) -> Result<(), CineVibeError> {
    if (min..=max).contains(&limit) {
        Ok(())
    } else {
        Err(CineVibeError::validation_field(
            format!("limit must be between {} and {}, got {}", min, max, limit),
            "limit",
        ))
    }
}

/// Validate the minimum critic/audience gap for mismatch searches
///
/// # Examples
///
/// ```
/// use cinevibe_core::validation::validate_min_gap;
///
/// assert!(validate_min_gap(2.0).is_ok());
/// assert!(validate_min_gap(0.5).is_err());
/// assert!(validate_min_gap(f64::NAN).is_err());
/// ```
pub fn validate_min_gap(min_gap: f64) -> Result<(), CineVibeError> {
    if min_gap.is_finite() && (1.0..=5.0).contains(&min_gap) {
        Ok(())
    } else {
        Err(CineVibeError::validation_field(
            format!("min_gap must be between 1.0 and 5.0, got {}", min_gap),
            "min_gap",
        ))
    }
}

/// Validate a provider title id
pub fn validate_title_id(id: i64, field: &str) -> Result<(), CineVibeError> {
    if id > 0 {
        Ok(())
    } else {
        Err(CineVibeError::validation_field(
            format!("Field '{}' must be a positive id, got {}", field, id),
            field,
        ))
    }
}
