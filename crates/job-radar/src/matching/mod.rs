//! Additive preference-fit scoring for catalog postings.

mod preferences;
mod rules;

pub use preferences::{parse_list, PreferenceStore, UserPreferences};

use serde::{Deserialize, Serialize};

use crate::catalog::JobPosting;
use rules::ParsedPreferences;

pub const MAX_SCORE: u8 = 100;

/// Scores postings against one preference snapshot. Build a new engine after preferences change.
pub struct MatchEngine<'a> {
    parsed: Option<ParsedPreferences<'a>>,
}

impl<'a> MatchEngine<'a> {
    /// `None` preferences produce an engine that scores every job `{0, none}`.
    pub fn new(preferences: Option<&'a UserPreferences>) -> Self {
        Self {
            parsed: preferences.map(ParsedPreferences::new),
        }
    }

    pub fn score(&self, job: &JobPosting) -> MatchResult {
        let points: u32 = self
            .breakdown(job)
            .iter()
            .map(|component| u32::from(component.points))
            .sum();
        MatchResult::from_points(points)
    }

    /// Satisfied clauses before capping. Empty when no preferences are set.
    pub fn breakdown(&self, job: &JobPosting) -> Vec<ScoreComponent> {
        match &self.parsed {
            Some(parsed) => rules::score_components(job, parsed),
            None => Vec::new(),
        }
    }
}

/// Convenience for one-off scoring.
pub fn score(job: &JobPosting, preferences: Option<&UserPreferences>) -> MatchResult {
    MatchEngine::new(preferences).score(job)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u8,
    pub tier: MatchTier,
}

impl MatchResult {
    pub const NONE: Self = Self {
        score: 0,
        tier: MatchTier::NoMatch,
    };

    fn from_points(points: u32) -> Self {
        let score = points.min(u32::from(MAX_SCORE)) as u8;
        Self {
            score,
            tier: MatchTier::for_score(score),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    High,
    Medium,
    Low,
    #[serde(rename = "none")]
    NoMatch,
}

impl MatchTier {
    pub const fn for_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Self::High,
            60..=79 => Self::Medium,
            40..=59 => Self::Low,
            _ => Self::NoMatch,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::NoMatch => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFactor {
    TitleKeyword,
    DescriptionKeyword,
    Location,
    WorkMode,
    Experience,
    Skills,
    Freshness,
    Source,
}

/// One satisfied scoring clause, kept for explaining a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: MatchFactor,
    pub points: u8,
    pub note: String,
}
