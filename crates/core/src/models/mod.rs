//! Domain models shared by every CineVibe crate
//!
//! All models are request-scoped values. Optional fields stay `None` when no
//! provider supplied them; nothing is ever defaulted to zero.

pub mod community;
pub mod title;

pub use community::{
    CommunityData, CommunityPick, CommunityStats, CommunityTrendingEntry, RelatedTitle, Sentiment,
};
pub use title::{
    truncate_overview, CastMember, MediaType, RatingSet, Title, TitleRef, TitleSummary,
    OVERVIEW_PREVIEW_CHARS,
};
