use std::collections::HashSet;

use super::preferences::UserPreferences;
use super::{MatchFactor, ScoreComponent};
use crate::catalog::{JobPosting, JobSource};

const TITLE_KEYWORD_POINTS: u8 = 25;
const DESCRIPTION_KEYWORD_POINTS: u8 = 15;
const LOCATION_POINTS: u8 = 15;
const MODE_POINTS: u8 = 10;
const EXPERIENCE_POINTS: u8 = 10;
const SKILL_POINTS: u8 = 15;
const FRESH_POSTING_POINTS: u8 = 5;
const LINKEDIN_POINTS: u8 = 5;

const FRESH_POSTING_DAYS: u32 = 2;

/// Tokenized preference lists, parsed once per engine rather than once per job.
pub(crate) struct ParsedPreferences<'a> {
    pub preferences: &'a UserPreferences,
    pub keywords: Vec<String>,
    pub skills: HashSet<String>,
}

impl<'a> ParsedPreferences<'a> {
    pub fn new(preferences: &'a UserPreferences) -> Self {
        Self {
            preferences,
            keywords: preferences.keyword_tokens(),
            skills: preferences.skill_tokens().into_iter().collect(),
        }
    }
}

/// Every satisfied clause, in table order. Clauses are independent of each other.
pub(crate) fn score_components(
    job: &JobPosting,
    parsed: &ParsedPreferences<'_>,
) -> Vec<ScoreComponent> {
    let prefs = parsed.preferences;
    let mut components = Vec::new();

    if let Some(keyword) = first_contained(&parsed.keywords, &job.title) {
        components.push(ScoreComponent {
            factor: MatchFactor::TitleKeyword,
            points: TITLE_KEYWORD_POINTS,
            note: format!("title mentions '{keyword}'"),
        });
    }

    if let Some(keyword) = first_contained(&parsed.keywords, &job.description) {
        components.push(ScoreComponent {
            factor: MatchFactor::DescriptionKeyword,
            points: DESCRIPTION_KEYWORD_POINTS,
            note: format!("description mentions '{keyword}'"),
        });
    }

    if prefs.preferred_locations.contains(&job.location) {
        components.push(ScoreComponent {
            factor: MatchFactor::Location,
            points: LOCATION_POINTS,
            note: format!("{} is a preferred location", job.location),
        });
    }

    if prefs.preferred_modes.contains(&job.mode) {
        components.push(ScoreComponent {
            factor: MatchFactor::WorkMode,
            points: MODE_POINTS,
            note: format!("{} is a preferred work mode", job.mode),
        });
    }

    if !prefs.experience_level.is_empty() && prefs.experience_level == job.experience {
        components.push(ScoreComponent {
            factor: MatchFactor::Experience,
            points: EXPERIENCE_POINTS,
            note: format!("experience band {} matches", job.experience),
        });
    }

    let shared: Vec<&str> = job
        .skills
        .iter()
        .filter(|skill| parsed.skills.contains(&skill.to_lowercase()))
        .map(String::as_str)
        .collect();
    if !shared.is_empty() {
        components.push(ScoreComponent {
            factor: MatchFactor::Skills,
            points: SKILL_POINTS,
            note: format!("shared skills: {}", shared.join(", ")),
        });
    }

    if job.posted_days_ago <= FRESH_POSTING_DAYS {
        components.push(ScoreComponent {
            factor: MatchFactor::Freshness,
            points: FRESH_POSTING_POINTS,
            note: format!("posted {} day(s) ago", job.posted_days_ago),
        });
    }

    if job.source == JobSource::LinkedIn {
        components.push(ScoreComponent {
            factor: MatchFactor::Source,
            points: LINKEDIN_POINTS,
            note: "sourced from LinkedIn".to_string(),
        });
    }

    components
}

fn first_contained<'k>(keywords: &'k [String], haystack: &str) -> Option<&'k str> {
    if keywords.is_empty() {
        return None;
    }
    let haystack = haystack.to_lowercase();
    keywords
        .iter()
        .find(|keyword| haystack.contains(keyword.as_str()))
        .map(String::as_str)
}
