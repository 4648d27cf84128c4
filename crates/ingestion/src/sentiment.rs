//! Keyword-based sentiment over community comments
//!
//! Spoiler-tagged comments are skipped. Each remaining comment scores +1 per
//! positive keyword and -1 per negative keyword; the label comes from the
//! share of positive and negative comments.

use crate::aggregator::TraktComment;
use cinevibe_core::Sentiment;

const POSITIVE: &[&str] = &[
    "masterpiece",
    "amazing",
    "brilliant",
    "loved",
    "love",
    "great",
    "excellent",
    "beautiful",
    "fantastic",
    "perfect",
    "best",
    "stunning",
];

const NEGATIVE: &[&str] = &[
    "boring",
    "terrible",
    "awful",
    "waste",
    "bad",
    "worst",
    "disappointing",
    "overrated",
    "dull",
    "mess",
];

/// Theme label and the words that signal it
const THEMES: &[(&str, &[&str])] = &[
    ("mind-bending", &["twist", "confusing", "mind", "dream", "layers"]),
    ("visuals", &["visual", "cinematography", "effects", "stunning", "shot"]),
    ("soundtrack", &["score", "soundtrack", "music", "zimmer"]),
    ("acting", &["acting", "performance", "cast", "actor", "actress"]),
    ("emotional", &["cried", "tears", "emotional", "heart", "moving"]),
    ("funny", &["funny", "hilarious", "laugh", "comedy"]),
    ("slow pace", &["slow", "long", "pacing", "drags"]),
    ("rewatchable", &["rewatch", "again", "every time", "classic"]),
];

const MAX_THEMES: usize = 3;

/// Summarize a batch of comments; `None` when no usable comment remains
pub fn analyze_comments(comments: &[TraktComment]) -> Option<Sentiment> {
    let texts: Vec<String> = comments
        .iter()
        .filter(|c| !c.spoiler && !c.comment.trim().is_empty())
        .map(|c| c.comment.to_lowercase())
        .collect();

    if texts.is_empty() {
        return None;
    }

    let mut positive = 0usize;
    let mut negative = 0usize;
    for text in &texts {
        let score = keyword_hits(text, POSITIVE) as i64 - keyword_hits(text, NEGATIVE) as i64;
        if score > 0 {
            positive += 1;
        } else if score < 0 {
            negative += 1;
        }
    }

    let total = texts.len();
    let (label, user_vibe) = if positive * 10 >= total * 6 {
        ("positive", "Viewers are enthusiastic about it")
    } else if negative * 10 >= total * 6 {
        ("negative", "Viewers mostly came away disappointed")
    } else if positive > 0 && negative > 0 {
        ("mixed", "Viewers are split on it")
    } else {
        ("neutral", "Viewers discuss it without strong feelings")
    };

    let mut theme_counts: Vec<(&str, usize)> = THEMES
        .iter()
        .map(|(theme, words)| {
            let mentions = texts.iter().filter(|t| keyword_hits(t, words) > 0).count();
            (*theme, mentions)
        })
        .filter(|(_, mentions)| *mentions > 0)
        .collect();
    // Stable: ties keep table order
    theme_counts.sort_by(|a, b| b.1.cmp(&a.1));

    Some(Sentiment {
        label: label.to_string(),
        user_vibe: user_vibe.to_string(),
        common_themes: theme_counts
            .into_iter()
            .take(MAX_THEMES)
            .map(|(theme, _)| theme.to_string())
            .collect(),
        sample_size: total,
    })
}

fn keyword_hits(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| contains_word(text, k)).count()
}

/// Whole-word (or whole-phrase) containment
fn contains_word(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(start, _)| {
        let end = start + keyword.len();
        let before_ok = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}
