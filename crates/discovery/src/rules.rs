//! Rule tables for vibe, mood, time-context and personality discovery
//!
//! Every key maps to an immutable [`RuleSet`]. A rule is evaluated in two
//! places: pushed down to TMDb discover as far as the API allows, and
//! re-checked locally against each candidate.

use crate::mismatch::{gap_tenths, reaches};
use cinevibe_core::Title;
use cinevibe_ingestion::aggregator::GenreMatch;
use cinevibe_ingestion::{CanonicalGenre, DiscoverQuery};
use serde::{Serialize, Serializer};
use tracing::warn;
use CanonicalGenre::*;

/// Provider-side sort order for discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Popularity,
    VoteAverage,
    VoteCount,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Popularity => "popularity.desc",
            Self::VoteAverage => "vote_average.desc",
            Self::VoteCount => "vote_count.desc",
        }
    }
}

/// Which side of the critic/audience split a rule asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapDirection {
    CriticsAhead,
    AudienceAhead,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GapConstraint {
    pub direction: GapDirection,
    pub min: f64,
}

impl GapConstraint {
    fn accepts(&self, audience: Option<f64>, critic: Option<f64>) -> bool {
        match gap_tenths(audience, critic) {
            Some(tenths) => match self.direction {
                GapDirection::AudienceAhead => reaches(tenths, self.min),
                GapDirection::CriticsAhead => reaches(-tenths, self.min),
            },
            None => false,
        }
    }
}

/// Constraint record behind every rule key
///
/// Absent constraints accept everything. A present constraint rejects a
/// title that lacks the field it needs.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RuleSet {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_canonical: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_canonical: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_audience: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_audience: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_critic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_critic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_runtime: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_runtime: Option<u32>,
    /// Only pushed down; listings and details agree on vote counts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_votes: Option<u32>,
    #[serde(serialize_with = "genre_names", skip_serializing_if = "Vec::is_empty")]
    pub any_genres: Vec<CanonicalGenre>,
    #[serde(serialize_with = "genre_names", skip_serializing_if = "Vec::is_empty")]
    pub all_genres: Vec<CanonicalGenre>,
    #[serde(serialize_with = "genre_names", skip_serializing_if = "Vec::is_empty")]
    pub excluded_genres: Vec<CanonicalGenre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<GapConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age_years: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub award_tokens: Vec<&'static str>,
    pub sort_by: SortOrder,
}

fn genre_names<S: Serializer>(genres: &[CanonicalGenre], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(genres.iter().map(|g| g.as_str()))
}

impl RuleSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn min_canonical(mut self, value: f64) -> Self {
        self.min_canonical = Some(value);
        self
    }

    pub fn max_canonical(mut self, value: f64) -> Self {
        self.max_canonical = Some(value);
        self
    }

    pub fn min_audience(mut self, value: f64) -> Self {
        self.min_audience = Some(value);
        self
    }

    pub fn min_critic(mut self, value: f64) -> Self {
        self.min_critic = Some(value);
        self
    }

    pub fn max_critic(mut self, value: f64) -> Self {
        self.max_critic = Some(value);
        self
    }

    pub fn min_runtime(mut self, minutes: u32) -> Self {
        self.min_runtime = Some(minutes);
        self
    }

    pub fn max_runtime(mut self, minutes: u32) -> Self {
        self.max_runtime = Some(minutes);
        self
    }

    pub fn min_votes(mut self, votes: u32) -> Self {
        self.min_votes = Some(votes);
        self
    }

    pub fn any_of(mut self, genres: &[CanonicalGenre]) -> Self {
        self.any_genres = genres.to_vec();
        self
    }

    pub fn all_of(mut self, genres: &[CanonicalGenre]) -> Self {
        self.all_genres = genres.to_vec();
        self
    }

    pub fn excluding(mut self, genres: &[CanonicalGenre]) -> Self {
        self.excluded_genres = genres.to_vec();
        self
    }

    pub fn gap(mut self, direction: GapDirection, min: f64) -> Self {
        self.gap = Some(GapConstraint { direction, min });
        self
    }

    pub fn min_age_years(mut self, years: i32) -> Self {
        self.min_age_years = Some(years);
        self
    }

    pub fn award_tokens(mut self, tokens: &[&'static str]) -> Self {
        self.award_tokens = tokens.to_vec();
        self
    }

    pub fn sort_by(mut self, order: SortOrder) -> Self {
        self.sort_by = order;
        self
    }

    /// AND of every present constraint
    pub fn matches(&self, title: &Title, current_year: i32) -> bool {
        let ratings = &title.ratings;

        within(ratings.canonical, self.min_canonical, self.max_canonical)
            && within(ratings.audience, self.min_audience, self.max_audience)
            && within(ratings.critic_percentage, self.min_critic, self.max_critic)
            && within(
                title.runtime_minutes.map(f64::from),
                self.min_runtime.map(f64::from),
                self.max_runtime.map(f64::from),
            )
            && self.genres_match(title)
            && self
                .gap
                .map_or(true, |gap| gap.accepts(ratings.audience, ratings.critic_percentage))
            && self.min_age_years.map_or(true, |years| {
                title.year.is_some_and(|year| current_year - year >= years)
            })
            && self.awards_match(title.awards.as_deref())
    }

    fn genres_match(&self, title: &Title) -> bool {
        let has = |g: &CanonicalGenre| title.has_genre(g.as_str());

        (self.any_genres.is_empty() || self.any_genres.iter().any(has))
            && self.all_genres.iter().all(has)
            && !self.excluded_genres.iter().any(has)
    }

    fn awards_match(&self, awards: Option<&str>) -> bool {
        if self.award_tokens.is_empty() {
            return true;
        }

        match awards {
            Some(text) if text != "N/A" => self.award_tokens.iter().any(|t| text.contains(t)),
            _ => false,
        }
    }

    /// Whether checking this rule needs OMDb data a listing does not carry
    pub fn needs_secondary(&self) -> bool {
        self.min_audience.is_some()
            || self.max_audience.is_some()
            || self.min_critic.is_some()
            || self.max_critic.is_some()
            || self.gap.is_some()
            || !self.award_tokens.is_empty()
    }

    /// Constraints left to check locally after [`Self::to_discover_query`]
    ///
    /// Canonical rating, runtime, votes and age are filtered by the provider.
    /// Genres are kept because the any-of list may be truncated by the
    /// provider's own matching.
    pub fn residual(&self) -> RuleSet {
        RuleSet {
            name: self.name.clone(),
            min_audience: self.min_audience,
            max_audience: self.max_audience,
            min_critic: self.min_critic,
            max_critic: self.max_critic,
            any_genres: self.any_genres.clone(),
            all_genres: self.all_genres.clone(),
            excluded_genres: self.excluded_genres.clone(),
            gap: self.gap,
            award_tokens: self.award_tokens.clone(),
            sort_by: self.sort_by,
            ..Default::default()
        }
    }

    /// Provider-side filters for one discover page
    pub fn to_discover_query(&self, page: u32, current_year: i32) -> DiscoverQuery {
        let (with_genres, genre_match) = if !self.all_genres.is_empty() {
            (tmdb_ids(&self.all_genres), GenreMatch::All)
        } else {
            (tmdb_ids(&self.any_genres), GenreMatch::Any)
        };

        DiscoverQuery {
            sort_by: self.sort_by.as_str().to_string(),
            min_votes: self.min_votes,
            min_rating: self.min_canonical,
            max_rating: self.max_canonical,
            with_genres,
            genre_match,
            without_genres: tmdb_ids(&self.excluded_genres),
            min_runtime: self.min_runtime,
            max_runtime: self.max_runtime,
            released_before: self
                .min_age_years
                .map(|years| format!("{}-12-31", current_year - years)),
            page,
        }
    }

    /// Combine with a second rule, never loosening this one
    ///
    /// Minimums take the larger value, maximums the smaller, exclusions are
    /// unioned, and constraints missing here are taken from `other`.
    pub fn overlay(&self, other: &RuleSet) -> RuleSet {
        let mut all_genres = self.all_genres.clone();
        union_into(&mut all_genres, &other.all_genres);
        let mut excluded_genres = self.excluded_genres.clone();
        union_into(&mut excluded_genres, &other.excluded_genres);

        let gap = match (self.gap, other.gap) {
            (Some(a), Some(b)) if a.direction == b.direction => Some(GapConstraint {
                direction: a.direction,
                min: a.min.max(b.min),
            }),
            (Some(a), _) => Some(a),
            (None, b) => b,
        };

        RuleSet {
            name: format!("{}+{}", self.name, other.name),
            min_canonical: tighter(self.min_canonical, other.min_canonical, f64::max),
            max_canonical: tighter(self.max_canonical, other.max_canonical, f64::min),
            min_audience: tighter(self.min_audience, other.min_audience, f64::max),
            max_audience: tighter(self.max_audience, other.max_audience, f64::min),
            min_critic: tighter(self.min_critic, other.min_critic, f64::max),
            max_critic: tighter(self.max_critic, other.max_critic, f64::min),
            min_runtime: tighter(self.min_runtime, other.min_runtime, u32::max),
            max_runtime: tighter(self.max_runtime, other.max_runtime, u32::min),
            min_votes: tighter(self.min_votes, other.min_votes, u32::max),
            any_genres: if self.any_genres.is_empty() {
                other.any_genres.clone()
            } else {
                self.any_genres.clone()
            },
            all_genres,
            excluded_genres,
            gap,
            min_age_years: tighter(self.min_age_years, other.min_age_years, i32::max),
            award_tokens: if self.award_tokens.is_empty() {
                other.award_tokens.clone()
            } else {
                self.award_tokens.clone()
            },
            sort_by: self.sort_by,
        }
    }
}

fn within(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }

    match value {
        Some(v) => min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m),
        None => false,
    }
}

fn tighter<T: Copy>(a: Option<T>, b: Option<T>, pick: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(pick(a, b)),
        (a, b) => a.or(b),
    }
}

fn union_into(target: &mut Vec<CanonicalGenre>, extra: &[CanonicalGenre]) {
    for genre in extra {
        if !target.contains(genre) {
            target.push(*genre);
        }
    }
}

fn tmdb_ids(genres: &[CanonicalGenre]) -> Vec<u32> {
    genres.iter().map(|g| g.tmdb_id()).collect()
}

/// Rule used for any key that is not in its table
pub fn fallback_rule() -> RuleSet {
    RuleSet::new("fallback")
        .min_canonical(6.0)
        .min_votes(100)
        .sort_by(SortOrder::Popularity)
}

/// A closed table of rule keys
pub trait RuleKey: Sized + Copy + 'static {
    /// Table name used in logs and resources
    const KIND: &'static str;
    const ALL: &'static [Self];

    fn key(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn rule(&self) -> RuleSet;

    /// Case-insensitive; "crowd-pleasing" and "crowd pleasing" match `crowd_pleasing`
    fn parse(key: &str) -> Option<Self> {
        let normalized = key.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL.iter().copied().find(|k| k.key() == normalized)
    }
}

/// Look up a key, falling back to [`fallback_rule`] when it is unknown
pub fn resolve<K: RuleKey>(key: &str) -> RuleSet {
    match K::parse(key) {
        Some(k) => k.rule(),
        None => {
            warn!(kind = K::KIND, key = %key, "Unknown rule key, using fallback rule");
            fallback_rule()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VibeModifier {
    Accessible,
    Grounded,
    Cerebral,
    CrowdPleasing,
    Challenging,
}

impl RuleKey for VibeModifier {
    const KIND: &'static str = "vibe_modifier";
    const ALL: &'static [Self] = &[
        Self::Accessible,
        Self::Grounded,
        Self::Cerebral,
        Self::CrowdPleasing,
        Self::Challenging,
    ];

    fn key(&self) -> &'static str {
        match self {
            Self::Accessible => "accessible",
            Self::Grounded => "grounded",
            Self::Cerebral => "cerebral",
            Self::CrowdPleasing => "crowd_pleasing",
            Self::Challenging => "challenging",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Accessible => "Like the reference but easier to get into",
            Self::Grounded => "Like the reference but realistic, no fantasy elements",
            Self::Cerebral => "Like the reference but more thought-provoking",
            Self::CrowdPleasing => "Like the reference but with broad audience appeal",
            Self::Challenging => "Like the reference but long, demanding and critic-favored",
        }
    }

    fn rule(&self) -> RuleSet {
        let rule = RuleSet::new(self.key());
        match self {
            Self::Accessible => rule
                .min_canonical(6.5)
                .min_votes(1000)
                .max_runtime(130)
                .excluding(&[Documentary, Horror])
                .sort_by(SortOrder::Popularity),
            Self::Grounded => rule
                .excluding(&[Fantasy, ScienceFiction, Animation])
                .min_canonical(6.5)
                .min_votes(500)
                .sort_by(SortOrder::VoteAverage),
            Self::Cerebral => rule
                .min_canonical(7.0)
                .min_critic(75.0)
                .min_votes(500)
                .sort_by(SortOrder::VoteAverage),
            Self::CrowdPleasing => rule
                .min_audience(7.0)
                .min_canonical(6.5)
                .min_votes(2000)
                .sort_by(SortOrder::Popularity),
            Self::Challenging => rule
                .min_runtime(120)
                .min_critic(80.0)
                .gap(GapDirection::CriticsAhead, 1.0)
                .min_votes(300)
                .sort_by(SortOrder::VoteAverage),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Cozy,
    Energetic,
    Thoughtful,
    Comfort,
}

impl RuleKey for Mood {
    const KIND: &'static str = "mood";
    const ALL: &'static [Self] = &[Self::Cozy, Self::Energetic, Self::Thoughtful, Self::Comfort];

    fn key(&self) -> &'static str {
        match self {
            Self::Cozy => "cozy",
            Self::Energetic => "energetic",
            Self::Thoughtful => "thoughtful",
            Self::Comfort => "comfort",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Cozy => "Warm, light films for a relaxed night in",
            Self::Energetic => "Fast-paced action and adventure",
            Self::Thoughtful => "Well-reviewed films that leave you thinking",
            Self::Comfort => "Familiar favorites that have stood the test of time",
        }
    }

    fn rule(&self) -> RuleSet {
        let rule = RuleSet::new(self.key());
        match self {
            Self::Cozy => rule
                .any_of(&[Comedy, Romance, Family, Animation])
                .excluding(&[Horror, Thriller, War, Crime])
                .min_canonical(6.5)
                .max_runtime(120),
            Self::Energetic => rule
                .any_of(&[Action, Adventure, ScienceFiction])
                .min_canonical(6.5)
                .excluding(&[Documentary]),
            Self::Thoughtful => rule
                .any_of(&[Drama, Mystery, ScienceFiction, History])
                .min_canonical(7.5)
                .min_critic(70.0)
                .sort_by(SortOrder::VoteAverage),
            Self::Comfort => rule
                .any_of(&[Comedy, Family, Animation, Romance])
                .min_canonical(7.0)
                .min_age_years(10)
                .excluding(&[Horror, War]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeContext {
    Morning,
    LateNight,
    Weekend,
}

impl RuleKey for TimeContext {
    const KIND: &'static str = "time_context";
    const ALL: &'static [Self] = &[Self::Morning, Self::LateNight, Self::Weekend];

    fn key(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::LateNight => "late_night",
            Self::Weekend => "weekend",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Morning => "Shorter, lighter picks",
            Self::LateNight => "Adult-oriented picks, no family fare",
            Self::Weekend => "Long films worth setting an afternoon aside for",
        }
    }

    fn rule(&self) -> RuleSet {
        let rule = RuleSet::new(self.key());
        match self {
            Self::Morning => rule.max_runtime(110).excluding(&[Horror, Thriller]),
            Self::LateNight => rule.excluding(&[Family, Animation]),
            Self::Weekend => rule.min_runtime(120),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Personality {
    CriticsDarling,
    CrowdPleaser,
    UniversalAcclaim,
    CultClassic,
    PrestigeAccessible,
}

impl RuleKey for Personality {
    const KIND: &'static str = "personality";
    const ALL: &'static [Self] = &[
        Self::CriticsDarling,
        Self::CrowdPleaser,
        Self::UniversalAcclaim,
        Self::CultClassic,
        Self::PrestigeAccessible,
    ];

    fn key(&self) -> &'static str {
        match self {
            Self::CriticsDarling => "critics_darling",
            Self::CrowdPleaser => "crowd_pleaser",
            Self::UniversalAcclaim => "universal_acclaim",
            Self::CultClassic => "cult_classic",
            Self::PrestigeAccessible => "prestige_accessible",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::CriticsDarling => "Loved by critics more than by audiences",
            Self::CrowdPleaser => "Loved by audiences more than by critics",
            Self::UniversalAcclaim => "Critics and audiences agree it is excellent",
            Self::CultClassic => "Older films critics dismissed but audiences kept alive",
            Self::PrestigeAccessible => "Award winners that are still easy to watch",
        }
    }

    fn rule(&self) -> RuleSet {
        let rule = RuleSet::new(self.key());
        match self {
            Self::CriticsDarling => rule
                .min_critic(85.0)
                .gap(GapDirection::CriticsAhead, 1.0)
                .min_votes(200)
                .sort_by(SortOrder::VoteAverage),
            Self::CrowdPleaser => rule
                .min_audience(7.0)
                .gap(GapDirection::AudienceAhead, 1.5)
                .min_votes(1000)
                .sort_by(SortOrder::Popularity),
            Self::UniversalAcclaim => rule
                .min_critic(90.0)
                .min_audience(8.0)
                .min_canonical(7.5)
                .min_votes(1000)
                .sort_by(SortOrder::VoteAverage),
            Self::CultClassic => rule
                .max_critic(60.0)
                .min_audience(7.0)
                .gap(GapDirection::AudienceAhead, 1.0)
                .min_age_years(15)
                .min_votes(300)
                .sort_by(SortOrder::VoteCount),
            Self::PrestigeAccessible => rule
                .award_tokens(&["Oscar"])
                .min_audience(7.0)
                .max_runtime(150)
                .min_canonical(7.0)
                .min_votes(2000)
                .sort_by(SortOrder::Popularity),
        }
    }
}
