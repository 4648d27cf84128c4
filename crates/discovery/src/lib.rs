//! CineVibe discovery
//!
//! Rating disagreement detection, rule-based vibe discovery and per-title
//! vibe analysis on top of the enriched titles from `cinevibe-ingestion`.

pub mod classifier;
pub mod community;
pub mod mismatch;
pub mod rules;
pub mod service;

pub use classifier::{analyze, VibeAnalysis};
pub use community::CommunityVibe;
pub use mismatch::{classification_label, detect, Mismatch, DEFAULT_MIN_GAP};
pub use rules::{
    fallback_rule, resolve, GapDirection, Mood, Personality, RuleKey, RuleSet, SortOrder,
    TimeContext, VibeModifier,
};
pub use service::VibeService;
