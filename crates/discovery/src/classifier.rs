//! Vibe analysis of a single enriched title
//!
//! Tags are independent (any number may apply, in table order). The mood
//! profile and viewing time are first-match priority lists.

use crate::mismatch::{detect, DEFAULT_MIN_GAP};
use crate::rules::{Personality, RuleKey};
use cinevibe_core::{RatingSet, Title, TitleRef};
use serde::{Deserialize, Serialize};

const MAJOR_AWARDS: [&str; 4] = ["Oscar", "Academy Award", "Golden Globe", "BAFTA"];

/// Full vibe breakdown returned by `analyze_title_vibe`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibeAnalysis {
    pub title_ref: TitleRef,
    pub tags: Vec<String>,
    pub mood_profile: String,
    pub best_viewing_time: String,
    pub rating_personality: Option<String>,
    pub accessibility_score: u8,
    pub prestige_score: u8,
    pub ratings: RatingSet,
}

struct TagRule {
    tag: &'static str,
    applies: fn(&Title) -> bool,
}

const TAG_RULES: &[TagRule] = &[
    TagRule {
        tag: "Mind-bending",
        applies: |t| {
            t.has_any_genre(&["Science Fiction", "Mystery"]) && at_least(t.ratings.canonical, 7.0)
        },
    },
    TagRule {
        tag: "Feel-good",
        applies: |t| t.has_any_genre(&["Comedy", "Family", "Animation"]) && !t.has_genre("Horror"),
    },
    TagRule {
        tag: "Dark & intense",
        applies: |t| t.has_any_genre(&["Horror", "Thriller", "Crime", "War"]),
    },
    TagRule {
        tag: "Epic",
        applies: |t| t.runtime_minutes.is_some_and(|m| m >= 150),
    },
    TagRule {
        tag: "Quick watch",
        applies: |t| t.runtime_minutes.is_some_and(|m| m <= 95),
    },
    TagRule {
        tag: "Award-winning",
        applies: |t| mentions_any(t.awards.as_deref(), &MAJOR_AWARDS),
    },
    TagRule {
        tag: "Critics' darling",
        applies: |t| at_least(t.ratings.critic_percentage, 90.0),
    },
    TagRule {
        tag: "Crowd-pleaser",
        applies: |t| at_least(t.ratings.audience, 8.0),
    },
    TagRule {
        tag: "Divisive",
        applies: |t| {
            detect(t.ratings.audience, t.ratings.critic_percentage, DEFAULT_MIN_GAP).is_some()
        },
    },
    TagRule {
        tag: "Universally acclaimed",
        applies: |t| {
            at_least(t.ratings.critic_percentage, 90.0) && at_least(t.ratings.audience, 8.0)
        },
    },
    TagRule {
        tag: "Hidden gem",
        applies: |t| at_least(t.ratings.canonical, 7.0) && t.vote_count.is_some_and(|v| v < 1000),
    },
    TagRule {
        tag: "Romantic",
        applies: |t| t.has_genre("Romance"),
    },
    TagRule {
        tag: "Action-packed",
        applies: |t| t.has_any_genre(&["Action", "Adventure"]),
    },
];

fn at_least(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v >= threshold)
}

fn mentions_any(text: Option<&str>, tokens: &[&str]) -> bool {
    match text {
        Some(text) if text != "N/A" => tokens.iter().any(|t| text.contains(t)),
        _ => false,
    }
}

/// Ordered tags for a title; empty when nothing applies
pub fn tags(title: &Title) -> Vec<String> {
    TAG_RULES
        .iter()
        .filter(|rule| (rule.applies)(title))
        .map(|rule| rule.tag.to_string())
        .collect()
}

pub fn mood_profile(title: &Title) -> &'static str {
    if mentions_any(title.awards.as_deref(), &MAJOR_AWARDS) && at_least(title.ratings.canonical, 7.5)
    {
        "Prestige"
    } else if title.has_any_genre(&["Science Fiction", "Mystery"])
        && at_least(title.ratings.canonical, 7.0)
    {
        "Cerebral"
    } else if title.has_any_genre(&["Horror", "Thriller", "Crime", "War"]) {
        "Dark"
    } else if title.has_any_genre(&["Comedy", "Romance", "Family", "Animation"]) {
        "Cozy"
    } else if title.has_any_genre(&["Action", "Adventure"]) {
        "Energetic"
    } else if title.has_any_genre(&["Drama", "History", "Documentary"]) {
        "Reflective"
    } else {
        "Balanced"
    }
}

pub fn best_viewing_time(title: &Title) -> &'static str {
    if title.has_any_genre(&["Horror", "Thriller"]) {
        "Late night"
    } else if title.runtime_minutes.is_some_and(|m| m >= 150) {
        "Weekend afternoon"
    } else if title.has_any_genre(&["Family", "Animation"]) {
        "Early evening with family"
    } else if title.has_any_genre(&["Comedy", "Romance"]) {
        "Cozy evening in"
    } else {
        "Evening"
    }
}

/// Key of the first personality rule the title satisfies
pub fn rating_personality(title: &Title, current_year: i32) -> Option<&'static str> {
    Personality::ALL
        .iter()
        .find(|p| p.rule().matches(title, current_year))
        .map(|p| p.key())
}

/// How easy the title is to pick up and enjoy, 1-10
pub fn accessibility_score(title: &Title) -> u8 {
    let ratings = &title.ratings;
    let mut score: i32 = 5;

    if at_least(ratings.canonical, 7.0) {
        score += 1;
    }
    if at_least(ratings.audience, 7.5) {
        score += 1;
    }
    if title.vote_count.is_some_and(|v| v >= 10_000) {
        score += 1;
    }
    match title.runtime_minutes {
        Some(m) if m <= 120 => score += 1,
        Some(m) if m >= 150 => score -= 1,
        _ => {}
    }
    if title.has_any_genre(&["Horror", "Documentary"]) {
        score -= 1;
    }
    if title.has_any_genre(&["Comedy", "Family", "Animation", "Action"]) {
        score += 1;
    }
    if let (Some(critic), Some(audience)) = (ratings.critic_percentage, ratings.audience) {
        if critic >= 85.0 && critic / 10.0 - audience >= 1.5 {
            score -= 1;
        }
    }

    clamp_score(score)
}

/// Awards and critical standing, 1-10
pub fn prestige_score(title: &Title) -> u8 {
    let ratings = &title.ratings;
    let awards = title.awards.as_deref();
    let mut score: i32 = 3;

    if mentions_any(awards, &["Oscar", "Academy Award"]) {
        score += 2;
    }
    if mentions_any(awards, &["Golden Globe", "BAFTA"]) {
        score += 1;
    }
    match ratings.critic_percentage {
        Some(c) if c >= 90.0 => score += 2,
        Some(c) if c >= 75.0 => score += 1,
        _ => {}
    }
    if at_least(ratings.critic_weighted, 80.0) {
        score += 1;
    }
    if at_least(ratings.canonical, 8.0) {
        score += 1;
    }
    if title.has_any_genre(&["Drama", "History"]) {
        score += 1;
    }

    clamp_score(score)
}

fn clamp_score(score: i32) -> u8 {
    score.clamp(1, 10) as u8
}

/// Build the full analysis of an enriched title
pub fn analyze(title: &Title, current_year: i32) -> VibeAnalysis {
    VibeAnalysis {
        title_ref: title.title_ref(),
        tags: tags(title),
        mood_profile: mood_profile(title).to_string(),
        best_viewing_time: best_viewing_time(title).to_string(),
        rating_personality: rating_personality(title, current_year).map(str::to_string),
        accessibility_score: accessibility_score(title),
        prestige_score: prestige_score(title),
        ratings: title.ratings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinevibe_core::MediaType;

    fn inception() -> Title {
        let mut title = Title::new(27205, "Inception", MediaType::Movie);
        title.year = Some(2010);
        title.runtime_minutes = Some(148);
        title.genres = vec![
            "Action".to_string(),
            "Science Fiction".to_string(),
            "Adventure".to_string(),
        ];
        title.awards = Some("Won 4 Oscars. 159 wins & 220 nominations total".to_string());
        title.vote_count = Some(36_000);
        title.ratings = RatingSet {
            canonical: Some(8.4),
            audience: Some(8.8),
            critic_percentage: Some(87.0),
            critic_weighted: Some(74.0),
        };
        title
    }

    #[test]
    fn test_tags_in_table_order() {
        assert_eq!(
            tags(&inception()),
            vec!["Mind-bending", "Award-winning", "Crowd-pleaser", "Action-packed"]
        );
    }

    #[test]
    fn test_no_data_means_no_tags() {
        let title = Title::new(1, "Unknown", MediaType::Movie);
        assert!(tags(&title).is_empty());
        assert_eq!(mood_profile(&title), "Balanced");
        assert_eq!(best_viewing_time(&title), "Evening");
    }

    #[test]
    fn test_mood_profile_awards_first() {
        assert_eq!(mood_profile(&inception()), "Prestige");

        let mut title = inception();
        title.awards = None;
        assert_eq!(mood_profile(&title), "Cerebral");

        title.ratings.canonical = Some(6.0);
        assert_eq!(mood_profile(&title), "Energetic");
    }

    #[test]
    fn test_best_viewing_time_priority() {
        let mut title = Title::new(1, "x", MediaType::Movie);
        title.genres = vec!["Horror".to_string(), "Comedy".to_string()];
        title.runtime_minutes = Some(160);
        assert_eq!(best_viewing_time(&title), "Late night");

        title.genres = vec!["Comedy".to_string()];
        assert_eq!(best_viewing_time(&title), "Weekend afternoon");

        title.runtime_minutes = Some(90);
        assert_eq!(best_viewing_time(&title), "Cozy evening in");
    }

    #[test]
    fn test_divisive_and_hidden_gem() {
        let mut title = Title::new(1, "x", MediaType::Movie);
        title.ratings.audience = Some(8.0);
        title.ratings.critic_percentage = Some(40.0);
        title.ratings.canonical = Some(7.2);
        title.vote_count = Some(300);

        let tags = tags(&title);
        assert!(tags.contains(&"Divisive".to_string()));
        assert!(tags.contains(&"Hidden gem".to_string()));
        assert!(tags.contains(&"Crowd-pleaser".to_string()));
    }

    #[test]
    fn test_divisive_on_threshold() {
        let mut title = Title::new(1, "x", MediaType::Movie);
        title.ratings.audience = Some(8.2);
        title.ratings.critic_percentage = Some(62.0);
        assert!(tags(&title).contains(&"Divisive".to_string()));

        title.ratings.critic_percentage = Some(63.0);
        assert!(!tags(&title).contains(&"Divisive".to_string()));
    }

    #[test]
    fn test_scores() {
        let title = inception();
        // 5 +1 canonical +1 audience +1 votes +1 action
        assert_eq!(accessibility_score(&title), 9);
        // 3 +2 oscar +1 critic>=75 +1 canonical>=8
        assert_eq!(prestige_score(&title), 7);

        let bare = Title::new(1, "x", MediaType::Movie);
        assert_eq!(accessibility_score(&bare), 5);
        assert_eq!(prestige_score(&bare), 3);
    }

    #[test]
    fn test_scores_are_clamped() {
        let mut title = inception();
        title.awards = Some("Won 2 Oscars, a Golden Globe and a BAFTA".to_string());
        title.ratings.critic_percentage = Some(96.0);
        title.ratings.critic_weighted = Some(90.0);
        title.genres.push("Drama".to_string());
        title.genres.push("History".to_string());

        assert_eq!(prestige_score(&title), 10);
    }

    #[test]
    fn test_personality() {
        let mut title = inception();
        title.ratings.critic_percentage = Some(94.0);
        assert_eq!(rating_personality(&title, 2024), Some("universal_acclaim"));

        title.ratings.critic_percentage = Some(20.0);
        title.ratings.audience = Some(7.4);
        assert_eq!(rating_personality(&title, 2024), Some("crowd_pleaser"));

        // audience ahead by 1.4 but only 14 years old
        title.ratings.critic_percentage = Some(60.0);
        assert_eq!(rating_personality(&title, 2024), Some("prestige_accessible"));
        title.awards = None;
        assert_eq!(rating_personality(&title, 2024), None);
        assert_eq!(rating_personality(&title, 2030), Some("cult_classic"));
    }

    #[test]
    fn test_analyze() {
        let analysis = analyze(&inception(), 2024);
        assert_eq!(analysis.title_ref.name, "Inception");
        assert_eq!(analysis.mood_profile, "Prestige");
        assert_eq!(analysis.best_viewing_time, "Evening");
        assert!((1..=10).contains(&analysis.accessibility_score));
        assert_eq!(analysis.ratings.audience, Some(8.8));
    }
}
