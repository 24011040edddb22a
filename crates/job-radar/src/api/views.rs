use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::catalog::{JobId, JobPosting};
use crate::digest::DailyDigest;
use crate::listing::{EmptyReason, ListingResult};
use crate::matching::{MatchResult, MatchTier, UserPreferences};
use crate::tracker::{format_relative_time, JobStatus, StatusUpdateRecord};

#[derive(Debug, Clone, Serialize)]
pub struct ListingView<'a> {
    pub total: usize,
    pub shown: usize,
    pub jobs: Vec<ListedJobView<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_reason: Option<EmptyReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListedJobView<'a> {
    #[serde(flatten)]
    pub job: &'a JobPosting,
    #[serde(rename = "match")]
    pub result: MatchResult,
    pub tier_label: &'static str,
}

impl<'a> From<&ListingResult<'a>> for ListingView<'a> {
    fn from(result: &ListingResult<'a>) -> Self {
        Self {
            total: result.total,
            shown: result.jobs.len(),
            jobs: result
                .jobs
                .iter()
                .map(|scored| ListedJobView {
                    job: scored.job,
                    result: scored.result,
                    tier_label: scored.result.tier.label(),
                })
                .collect(),
            empty_reason: result.empty_reason,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PreferencesView {
    pub configured: bool,
    pub preferences: UserPreferences,
}

impl From<Option<UserPreferences>> for PreferencesView {
    fn from(stored: Option<UserPreferences>) -> Self {
        let preferences = stored.unwrap_or_default();
        Self {
            configured: preferences.is_configured(),
            preferences,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateView {
    #[serde(flatten)]
    pub record: StatusUpdateRecord,
    pub status_label: &'static str,
    pub relative_time: String,
}

impl StatusUpdateView {
    pub fn new(record: StatusUpdateRecord, now: DateTime<Utc>) -> Self {
        Self {
            status_label: record.status.label(),
            relative_time: format_relative_time(record.updated_at, now),
            record,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedToggleView {
    pub job_id: JobId,
    pub saved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub job_id: JobId,
    pub status: JobStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct DigestView {
    pub date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<DigestEntryView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DigestEntryView {
    pub rank: usize,
    pub job: JobPosting,
    pub match_score: u8,
    pub tier: MatchTier,
}

impl From<DailyDigest> for DigestView {
    fn from(digest: DailyDigest) -> Self {
        Self {
            date: digest.date,
            generated_at: digest.generated_at,
            entries: digest
                .jobs
                .into_iter()
                .enumerate()
                .map(|(index, entry)| DigestEntryView {
                    rank: index + 1,
                    tier: MatchTier::for_score(entry.match_score),
                    match_score: entry.match_score,
                    job: entry.job,
                })
                .collect(),
        }
    }
}
