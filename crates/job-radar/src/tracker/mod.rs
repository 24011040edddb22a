//! Application status map with a bounded, newest-first change history.

mod domain;
mod relative_time;
mod saved;

pub use domain::{JobStatus, StatusUpdateRecord};
pub use relative_time::format_relative_time;
pub use saved::SavedJobs;

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use tracing::info;

use crate::catalog::{JobId, JobPosting};
use crate::clock::Clock;
use crate::listing::StatusLookup;
use crate::store::{self, KeyValueStore};

pub(crate) const STATUS_KEY: &str = "job_status";
pub(crate) const HISTORY_KEY: &str = "job_status_history";

pub const HISTORY_CAP: usize = 50;
pub const DEFAULT_RECENT_UPDATES: usize = 10;

/// Tracks one status per job. Persistence failures degrade to empty state and are logged.
pub struct StatusTracker<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: KeyValueStore + ?Sized> StatusTracker<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn get_status(&self, job_id: &JobId) -> JobStatus {
        self.all_statuses().status_of(job_id)
    }

    pub fn all_statuses(&self) -> BTreeMap<JobId, JobStatus> {
        store::load_or_default(self.store.as_ref(), STATUS_KEY)
    }

    /// Upserts the status and records the change at the head of the history.
    pub fn set_status(&self, job: &JobPosting, status: JobStatus) -> StatusUpdateRecord {
        let mut statuses = self.all_statuses();
        statuses.insert(job.id.clone(), status);
        store::save(self.store.as_ref(), STATUS_KEY, &statuses);

        let record = StatusUpdateRecord {
            job_id: job.id.clone(),
            job_title: job.title.clone(),
            company: job.company.clone(),
            status,
            updated_at: self.clock.now(),
        };

        let mut history: VecDeque<StatusUpdateRecord> = self.load_history();
        history.push_front(record.clone());
        history.truncate(HISTORY_CAP);
        store::save(self.store.as_ref(), HISTORY_KEY, &history);

        info!(job_id = %job.id, status = status.label(), "job status updated");
        record
    }

    /// The newest `count` history entries; all of them when fewer exist.
    pub fn recent_updates(&self, count: usize) -> Vec<StatusUpdateRecord> {
        self.load_history().into_iter().take(count).collect()
    }

    pub fn history(&self) -> Vec<StatusUpdateRecord> {
        self.load_history().into()
    }

    fn load_history(&self) -> VecDeque<StatusUpdateRecord> {
        store::load_or_default(self.store.as_ref(), HISTORY_KEY)
    }
}

impl StatusLookup for BTreeMap<JobId, JobStatus> {
    fn status_of(&self, job_id: &JobId) -> JobStatus {
        self.get(job_id).copied().unwrap_or_default()
    }
}

impl<S: KeyValueStore + ?Sized> StatusLookup for StatusTracker<S> {
    fn status_of(&self, job_id: &JobId) -> JobStatus {
        self.get_status(job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{JobSource, WorkMode};
    use crate::clock::FixedClock;
    use crate::store::testing::UnavailableStore;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone, Utc};

    fn posting(id: &str) -> JobPosting {
        JobPosting {
            id: JobId::from(id),
            title: format!("Role {id}"),
            company: "Acme".to_string(),
            location: "Pune".to_string(),
            mode: WorkMode::Remote,
            experience: "1-3".to_string(),
            salary_range: String::new(),
            skills: Vec::new(),
            description: String::new(),
            source: JobSource::Indeed,
            posted_days_ago: 0,
            apply_url: String::new(),
        }
    }

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        ))
    }

    #[test]
    fn unknown_jobs_are_not_applied() {
        let tracker = StatusTracker::new(Arc::new(MemoryStore::new()), clock());
        assert_eq!(
            tracker.get_status(&JobId::from("missing")),
            JobStatus::NotApplied
        );
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn set_status_updates_map_and_history_head() {
        let clock = clock();
        let tracker = StatusTracker::new(Arc::new(MemoryStore::new()), clock.clone());
        let job = posting("job-1");

        tracker.set_status(&job, JobStatus::Applied);
        clock.advance(Duration::minutes(5));
        tracker.set_status(&job, JobStatus::Selected);

        assert_eq!(tracker.get_status(&job.id), JobStatus::Selected);
        let history = tracker.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].status, JobStatus::Selected);
        assert_eq!(history[0].job_title, "Role job-1");
        assert_eq!(history[1].status, JobStatus::Applied);
        assert!(history[0].updated_at > history[1].updated_at);
    }

    #[test]
    fn history_is_capped_and_evicts_the_oldest() {
        let clock = clock();
        let tracker = StatusTracker::new(Arc::new(MemoryStore::new()), clock.clone());

        for index in 0..HISTORY_CAP {
            tracker.set_status(&posting(&format!("job-{index}")), JobStatus::Applied);
            clock.advance(Duration::seconds(1));
        }
        assert_eq!(tracker.history().len(), HISTORY_CAP);

        tracker.set_status(&posting("job-new"), JobStatus::Rejected);
        let history = tracker.history();
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history[0].job_id, JobId::from("job-new"));
        assert_eq!(history[HISTORY_CAP - 1].job_id, JobId::from("job-1"));
        assert!(history
            .iter()
            .all(|record| record.job_id != JobId::from("job-0")));
    }

    #[test]
    fn recent_updates_caps_at_available_entries() {
        let tracker = StatusTracker::new(Arc::new(MemoryStore::new()), clock());
        tracker.set_status(&posting("a"), JobStatus::Applied);
        tracker.set_status(&posting("b"), JobStatus::Applied);

        assert_eq!(tracker.recent_updates(1).len(), 1);
        assert_eq!(tracker.recent_updates(1)[0].job_id, JobId::from("b"));
        assert_eq!(tracker.recent_updates(DEFAULT_RECENT_UPDATES).len(), 2);
    }

    #[test]
    fn corrupt_slots_degrade_to_defaults() {
        let backing = Arc::new(MemoryStore::new());
        backing
            .set(STATUS_KEY, "[1,2")
            .expect("memory store accepts writes");
        backing
            .set(HISTORY_KEY, r#"{"not":"a list"}"#)
            .expect("memory store accepts writes");
        let tracker = StatusTracker::new(backing, clock());

        assert_eq!(tracker.get_status(&JobId::from("a")), JobStatus::NotApplied);
        assert!(tracker.history().is_empty());

        tracker.set_status(&posting("a"), JobStatus::Applied);
        assert_eq!(tracker.get_status(&JobId::from("a")), JobStatus::Applied);
        assert_eq!(tracker.history().len(), 1);
    }

    #[test]
    fn unavailable_store_never_propagates() {
        let tracker = StatusTracker::new(Arc::new(UnavailableStore), clock());
        let record = tracker.set_status(&posting("a"), JobStatus::Applied);

        assert_eq!(record.status, JobStatus::Applied);
        assert_eq!(tracker.get_status(&JobId::from("a")), JobStatus::NotApplied);
        assert!(tracker.recent_updates(5).is_empty());
    }

    #[test]
    fn status_map_persists_with_display_strings() {
        let backing = Arc::new(MemoryStore::new());
        let tracker = StatusTracker::new(backing.clone(), clock());
        tracker.set_status(&posting("a"), JobStatus::NotApplied);

        let raw = backing
            .get(STATUS_KEY)
            .expect("memory store reads")
            .expect("status map written");
        assert_eq!(raw, r#"{"a":"Not Applied"}"#);
    }

    #[test]
    fn status_parses_loose_spellings() {
        assert_eq!(
            "not-applied".parse::<JobStatus>(),
            Ok(JobStatus::NotApplied)
        );
        assert_eq!(
            "Not Applied".parse::<JobStatus>(),
            Ok(JobStatus::NotApplied)
        );
        assert_eq!("SELECTED".parse::<JobStatus>(), Ok(JobStatus::Selected));
        assert!("ghosted".parse::<JobStatus>().is_err());
    }
}
