//! Rating normalization
//!
//! Providers report ratings in several shapes: TMDb and IMDb use a 0-10
//! decimal, Rotten Tomatoes a "87%" string, Metacritic either a bare "74" or
//! "74/100". Everything here resolves to `None` instead of failing when a
//! value is missing, a sentinel, non-numeric, non-finite or out of range.

use serde::{Deserialize, Serialize};

/// Sentinel OMDb uses for unknown values
pub const NOT_AVAILABLE: &str = "N/A";

/// Native representation of a rating value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingScale {
    /// "7.3", 0 to 10
    Decimal10,
    /// "87%", 0 to 100
    PercentString,
    /// "74/100"
    OutOf100String,
    /// "74", 0 to 100
    Integer100,
}

impl RatingScale {
    fn max(&self) -> f64 {
        match self {
            Self::Decimal10 => 10.0,
            Self::PercentString | Self::OutOf100String | Self::Integer100 => 100.0,
        }
    }
}

/// Normalize a raw rating onto the common 0-10 axis
///
/// # Examples
///
/// ```
/// use cinevibe_ingestion::normalizer::{normalize, RatingScale};
///
/// assert_eq!(normalize("87%", RatingScale::PercentString), Some(8.7));
/// assert_eq!(normalize("N/A", RatingScale::Decimal10), None);
/// ```
pub fn normalize(raw: &str, scale: RatingScale) -> Option<f64> {
    let value = parse_native(raw, scale)?;
    Some(match scale {
        RatingScale::Decimal10 => value,
        _ => value / 10.0,
    })
}

/// Parse a raw rating as a 0-100 percentage
///
/// Used for the critic fields of a rating set, which keep their native
/// percentage form.
pub fn percentage(raw: &str, scale: RatingScale) -> Option<f64> {
    let value = parse_native(raw, scale)?;
    Some(match scale {
        RatingScale::Decimal10 => value * 10.0,
        _ => value,
    })
}

/// Validate an already-numeric 0-10 rating
pub fn normalize_decimal(value: f64) -> Option<f64> {
    in_range(value, RatingScale::Decimal10.max())
}

fn parse_native(raw: &str, scale: RatingScale) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case(NOT_AVAILABLE) {
        return None;
    }

    let numeric = match scale {
        RatingScale::Decimal10 | RatingScale::Integer100 => raw,
        RatingScale::PercentString => raw.strip_suffix('%')?.trim_end(),
        RatingScale::OutOf100String => {
            let (numerator, denominator) = raw.split_once('/')?;
            if denominator.trim() != "100" {
                return None;
            }
            numerator.trim()
        }
    };

    let value = numeric.parse::<f64>().ok()?;
    in_range(value, scale.max())
}

fn in_range(value: f64, max: f64) -> Option<f64> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Some(value)
    } else {
        None
    }
}

/// Treat OMDb's "N/A" sentinel and blank strings as absent
pub fn present(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(NOT_AVAILABLE))
        .map(str::to_string)
}
