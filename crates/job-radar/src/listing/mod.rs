//! Filter and sort pipeline behind the job listing views.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::catalog::{Catalog, JobId, JobPosting, JobSource, UnknownVariant, WorkMode};
use crate::matching::{MatchEngine, MatchResult, UserPreferences};
use crate::tracker::JobStatus;

/// Resolves a job's application status for the status filter.
pub trait StatusLookup {
    fn status_of(&self, job_id: &JobId) -> JobStatus;
}

impl StatusLookup for HashMap<JobId, JobStatus> {
    fn status_of(&self, job_id: &JobId) -> JobStatus {
        self.get(job_id).copied().unwrap_or_default()
    }
}

/// Optional, AND-combined listing criteria. `all` or an empty value means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub only_matches: bool,
    #[serde(deserialize_with = "all_as_none")]
    pub keyword: Option<String>,
    #[serde(deserialize_with = "all_as_none")]
    pub location: Option<String>,
    #[serde(deserialize_with = "all_as_none")]
    pub mode: Option<WorkMode>,
    #[serde(deserialize_with = "all_as_none")]
    pub experience: Option<String>,
    #[serde(deserialize_with = "all_as_none")]
    pub source: Option<JobSource>,
    #[serde(deserialize_with = "all_as_none")]
    pub status: Option<JobStatus>,
    pub sort: SortMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    Latest,
    Oldest,
    MatchScore,
    SalaryHigh,
    SalaryLow,
}

impl SortMode {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Latest,
            Self::Oldest,
            Self::MatchScore,
            Self::SalaryHigh,
            Self::SalaryLow,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Oldest => "oldest",
            Self::MatchScore => "match-score",
            Self::SalaryHigh => "salary-high",
            Self::SalaryLow => "salary-low",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortMode {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|mode| mode.label() == wanted)
            .ok_or_else(|| UnknownVariant::new("sort mode", value))
    }
}

/// A listed posting with its score for the current preferences.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredJob<'a> {
    pub job: &'a JobPosting,
    #[serde(rename = "match")]
    pub result: MatchResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// The minimum-score gate was active; lowering the threshold may help.
    ThresholdGate,
    Filters,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingResult<'a> {
    pub jobs: Vec<ScoredJob<'a>>,
    /// Catalog size before filtering.
    pub total: usize,
    pub empty_reason: Option<EmptyReason>,
}

impl ListingResult<'_> {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Filters the catalog, then applies exactly one stable sort.
pub fn query<'a>(
    catalog: &'a Catalog,
    preferences: Option<&UserPreferences>,
    statuses: &dyn StatusLookup,
    criteria: &FilterCriteria,
) -> ListingResult<'a> {
    let engine = MatchEngine::new(preferences);
    let mut jobs: Vec<ScoredJob<'a>> = catalog
        .jobs()
        .iter()
        .map(|job| ScoredJob {
            job,
            result: engine.score(job),
        })
        .collect();

    let gate = criteria
        .only_matches
        .then_some(preferences)
        .flatten()
        .filter(|prefs| prefs.is_configured())
        .map(UserPreferences::min_score);
    if let Some(min_score) = gate {
        jobs.retain(|scored| scored.result.score >= min_score);
    }

    jobs.retain(|scored| matches_filters(scored.job, statuses, criteria));
    sort_jobs(&mut jobs, criteria.sort);

    let empty_reason = jobs.is_empty().then(|| {
        if gate.is_some() {
            EmptyReason::ThresholdGate
        } else {
            EmptyReason::Filters
        }
    });

    debug!(
        total = catalog.len(),
        shown = jobs.len(),
        sort = criteria.sort.label(),
        "listing query evaluated"
    );

    ListingResult {
        jobs,
        total: catalog.len(),
        empty_reason,
    }
}

/// True when `job` passes every criterion except the score gate.
pub fn matches_filters(
    job: &JobPosting,
    statuses: &dyn StatusLookup,
    criteria: &FilterCriteria,
) -> bool {
    if let Some(keyword) = criteria.keyword.as_deref() {
        let keyword = keyword.to_lowercase();
        if !job.title.to_lowercase().contains(&keyword)
            && !job.company.to_lowercase().contains(&keyword)
        {
            return false;
        }
    }

    criteria
        .location
        .as_ref()
        .map_or(true, |l| *l == job.location)
        && criteria.mode.map_or(true, |mode| mode == job.mode)
        && criteria
            .experience
            .as_ref()
            .map_or(true, |e| *e == job.experience)
        && criteria.source.map_or(true, |source| source == job.source)
        && criteria
            .status
            .map_or(true, |status| statuses.status_of(&job.id) == status)
}

fn sort_jobs(jobs: &mut [ScoredJob<'_>], mode: SortMode) {
    match mode {
        SortMode::Latest => jobs.sort_by_key(|scored| scored.job.posted_days_ago),
        SortMode::Oldest => {
            jobs.sort_by(|a, b| b.job.posted_days_ago.cmp(&a.job.posted_days_ago))
        }
        SortMode::MatchScore => jobs.sort_by(|a, b| b.result.score.cmp(&a.result.score)),
        SortMode::SalaryHigh => jobs.sort_by(|a, b| {
            salary_figure(&b.job.salary_range).cmp(&salary_figure(&a.job.salary_range))
        }),
        SortMode::SalaryLow => jobs.sort_by_key(|scored| salary_figure(&scored.job.salary_range)),
    }
}

fn salary_digits() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]+").expect("salary pattern compiles"))
}

/// First contiguous ASCII digit run in the salary text; 0 when there is none.
pub fn salary_figure(salary_range: &str) -> u64 {
    salary_digits()
        .find(salary_range)
        .map(|digits| digits.as_str().parse().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

fn all_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(id: &str, title: &str, days: u32, salary: &str) -> JobPosting {
        JobPosting {
            id: JobId::from(id),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Pune".to_string(),
            mode: WorkMode::Remote,
            experience: "1-3".to_string(),
            salary_range: salary.to_string(),
            skills: Vec::new(),
            description: String::new(),
            source: JobSource::Naukri,
            posted_days_ago: days,
            apply_url: String::new(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            posting("a", "Rust Engineer", 5, "12-18 LPA"),
            posting("b", "Go Engineer", 1, "Not disclosed"),
            posting("c", "Rust Intern", 1, "₹20,000/month"),
            posting("d", "Designer", 9, "8 LPA"),
        ])
        .expect("unique ids")
    }

    fn ids(result: &ListingResult<'_>) -> Vec<String> {
        result
            .jobs
            .iter()
            .map(|scored| scored.job.id.to_string())
            .collect()
    }

    #[test]
    fn salary_uses_first_digit_run() {
        assert_eq!(salary_figure("12-18 LPA"), 12);
        assert_eq!(salary_figure("₹20,000/month"), 20);
        assert_eq!(salary_figure("Not disclosed"), 0);
        assert_eq!(salary_figure("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn salary_ignores_non_ascii_digits() {
        assert_eq!(salary_figure("₹५० LPA, 12"), 12);
        assert_eq!(salary_figure("٣ LPA"), 0);
    }

    #[test]
    fn latest_and_oldest_are_stable() {
        let catalog = catalog();
        let statuses = HashMap::new();

        let latest = query(&catalog, None, &statuses, &FilterCriteria::default());
        assert_eq!(ids(&latest), vec!["b", "c", "a", "d"]);

        let oldest = query(
            &catalog,
            None,
            &statuses,
            &FilterCriteria {
                sort: SortMode::Oldest,
                ..FilterCriteria::default()
            },
        );
        assert_eq!(ids(&oldest), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn salary_sorts_treat_missing_digits_as_zero() {
        let catalog = catalog();
        let statuses = HashMap::new();
        let by = |sort| {
            let criteria = FilterCriteria {
                sort,
                ..FilterCriteria::default()
            };
            ids(&query(&catalog, None, &statuses, &criteria))
        };

        assert_eq!(by(SortMode::SalaryHigh), vec!["c", "a", "d", "b"]);
        assert_eq!(by(SortMode::SalaryLow), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn keyword_matches_title_or_company() {
        let catalog = catalog();
        let criteria = FilterCriteria {
            keyword: Some("RUST".to_string()),
            ..FilterCriteria::default()
        };
        let result = query(&catalog, None, &HashMap::new(), &criteria);
        assert_eq!(ids(&result), vec!["c", "a"]);

        let by_company = FilterCriteria {
            keyword: Some("acme".to_string()),
            ..FilterCriteria::default()
        };
        let result = query(&catalog, None, &HashMap::new(), &by_company);
        assert_eq!(result.jobs.len(), 4);
    }

    #[test]
    fn status_filter_defaults_unknown_jobs_to_not_applied() {
        let catalog = catalog();
        let mut statuses = HashMap::new();
        statuses.insert(JobId::from("a"), JobStatus::Applied);

        let applied = FilterCriteria {
            status: Some(JobStatus::Applied),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&query(&catalog, None, &statuses, &applied)), vec!["a"]);

        let not_applied = FilterCriteria {
            status: Some(JobStatus::NotApplied),
            ..FilterCriteria::default()
        };
        assert_eq!(query(&catalog, None, &statuses, &not_applied).jobs.len(), 3);
    }

    #[test]
    fn threshold_gate_needs_configured_preferences() {
        let catalog = catalog();
        let criteria = FilterCriteria {
            only_matches: true,
            ..FilterCriteria::default()
        };
        let threshold_only = UserPreferences {
            min_match_score: Some(90),
            ..UserPreferences::default()
        };

        let ungated = query(&catalog, Some(&threshold_only), &HashMap::new(), &criteria);
        assert_eq!(ungated.jobs.len(), 4);

        let configured = UserPreferences {
            role_keywords: "rust".to_string(),
            ..threshold_only
        };
        let gated = query(&catalog, Some(&configured), &HashMap::new(), &criteria);
        assert!(gated.is_empty());
        assert_eq!(gated.empty_reason, Some(EmptyReason::ThresholdGate));
        assert_eq!(gated.total, 4);
    }

    #[test]
    fn unset_threshold_lets_every_job_through_the_gate() {
        let catalog = catalog();
        let prefs = UserPreferences {
            role_keywords: "nothing-matches".to_string(),
            min_match_score: None,
            ..UserPreferences::default()
        };
        let criteria = FilterCriteria {
            only_matches: true,
            ..FilterCriteria::default()
        };
        let result = query(&catalog, Some(&prefs), &HashMap::new(), &criteria);
        assert_eq!(result.jobs.len(), 4);
    }

    #[test]
    fn filter_only_emptiness_is_reported_as_filters() {
        let catalog = catalog();
        let criteria = FilterCriteria {
            location: Some("Mumbai".to_string()),
            ..FilterCriteria::default()
        };
        let result = query(&catalog, None, &HashMap::new(), &criteria);
        assert_eq!(result.empty_reason, Some(EmptyReason::Filters));
    }

    #[test]
    fn match_score_sort_keeps_catalog_order_on_ties() {
        let catalog = catalog();
        let prefs = UserPreferences {
            role_keywords: "engineer".to_string(),
            ..UserPreferences::default()
        };
        let criteria = FilterCriteria {
            sort: SortMode::MatchScore,
            ..FilterCriteria::default()
        };
        let result = query(&catalog, Some(&prefs), &HashMap::new(), &criteria);
        assert_eq!(ids(&result), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn criteria_parse_all_as_unset() {
        let criteria: FilterCriteria = serde_json::from_value(serde_json::json!({
            "location": "all",
            "mode": "Remote",
            "source": "ALL",
            "status": "Applied",
            "sort": "salary-high",
            "keyword": ""
        }))
        .expect("criteria decode");

        assert_eq!(criteria.location, None);
        assert_eq!(criteria.mode, Some(WorkMode::Remote));
        assert_eq!(criteria.source, None);
        assert_eq!(criteria.status, Some(JobStatus::Applied));
        assert_eq!(criteria.keyword, None);
        assert_eq!(criteria.sort, SortMode::SalaryHigh);
    }

    #[test]
    fn sort_mode_parses_labels() {
        assert_eq!("match-score".parse::<SortMode>(), Ok(SortMode::MatchScore));
        assert!("random".parse::<SortMode>().is_err());
    }
}
