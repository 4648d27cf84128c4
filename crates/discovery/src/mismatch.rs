//! Critic/audience disagreement detection
//!
//! The audience score is on a 0-10 scale and the critic score is a 0-100
//! percentage, so the critic score is divided by ten before comparing.

use cinevibe_core::{RatingSet, Title, TitleRef};
use serde::{Deserialize, Serialize};

/// Default gap for mismatch searches and for the rating analysis of a title
pub const DEFAULT_MIN_GAP: f64 = 2.0;

pub const AUDIENCE_AHEAD_LABEL: &str = "audience favors it over critics";
pub const CRITICS_AHEAD_LABEL: &str = "critics favor it over audience";
pub const STANDARD_LABEL: &str = "standard rating distribution";

/// Signed and absolute gap between audience and critics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// audience - critic/10; positive when the audience likes it more
    pub gap: f64,
    pub gap_magnitude: f64,
}

/// A title whose audience and critic scores disagree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mismatch {
    pub title_ref: TitleRef,
    pub audience_score: f64,
    pub critic_score: f64,
    pub gap: f64,
    pub gap_magnitude: f64,
    pub classification_label: String,
}

/// Signed gap in whole tenths of a point, or `None` when either score is unknown
///
/// Audience scores carry one decimal and critic percentages are whole numbers,
/// so every real gap is a whole number of tenths. Working in tenths keeps a gap
/// that sits exactly on a threshold from landing a hair below it.
pub fn gap_tenths(audience: Option<f64>, critic_percentage: Option<f64>) -> Option<i64> {
    Some((audience? * 10.0 - critic_percentage?).round() as i64)
}

/// Whether a gap in tenths reaches `threshold` points
pub fn reaches(gap_tenths: i64, threshold: f64) -> bool {
    gap_tenths >= (threshold * 10.0).round() as i64
}

/// Report a disagreement of at least `min_gap`
///
/// Missing data never produces a mismatch.
pub fn detect(
    audience: Option<f64>,
    critic_percentage: Option<f64>,
    min_gap: f64,
) -> Option<Detection> {
    let tenths = gap_tenths(audience, critic_percentage)?;

    reaches(tenths.abs(), min_gap).then(|| Detection {
        gap: from_tenths(tenths),
        gap_magnitude: from_tenths(tenths.abs()),
    })
}

fn from_tenths(tenths: i64) -> f64 {
    tenths as f64 / 10.0
}

/// Human-readable summary of a rating set
///
/// The gap label (only when the gap reaches `min_gap`) comes first, then the
/// absolute threshold labels, joined with "; ".
pub fn classification_label(ratings: &RatingSet, min_gap: f64) -> String {
    let mut labels: Vec<&str> = Vec::new();

    if let Some(detection) = detect(ratings.audience, ratings.critic_percentage, min_gap) {
        if detection.gap > 0.0 {
            labels.push(AUDIENCE_AHEAD_LABEL);
        } else if detection.gap < 0.0 {
            labels.push(CRITICS_AHEAD_LABEL);
        }
    }

    match ratings.canonical {
        Some(c) if c >= 8.5 => labels.push("highly acclaimed"),
        Some(c) if c <= 5.0 => labels.push("poorly received"),
        _ => {}
    }

    match ratings.critic_percentage {
        Some(c) if c >= 90.0 => labels.push("critics' choice"),
        Some(c) if c <= 30.0 => labels.push("critically panned"),
        _ => {}
    }

    if labels.is_empty() {
        STANDARD_LABEL.to_string()
    } else {
        labels.join("; ")
    }
}

impl Mismatch {
    /// Build a mismatch for an enriched title, if it has one
    pub fn from_title(title: &Title, min_gap: f64) -> Option<Self> {
        let audience_score = title.ratings.audience?;
        let critic_score = title.ratings.critic_percentage?;
        let detection = detect(Some(audience_score), Some(critic_score), min_gap)?;

        Some(Self {
            title_ref: title.title_ref(),
            audience_score,
            critic_score,
            gap: detection.gap,
            gap_magnitude: detection.gap_magnitude,
            classification_label: classification_label(&title.ratings, min_gap),
        })
    }
}

/// Order by gap magnitude, largest first; ties keep their input order
pub fn sort_mismatches(mismatches: &mut [Mismatch]) {
    mismatches.sort_by(|a, b| b.gap_magnitude.total_cmp(&a.gap_magnitude));
}
