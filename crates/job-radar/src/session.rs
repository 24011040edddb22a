use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::catalog::{Catalog, JobId, JobPosting};
use crate::clock::Clock;
use crate::digest::{DailyDigest, DigestGenerator};
use crate::listing::{self, FilterCriteria, ListingResult};
use crate::matching::{MatchEngine, MatchResult, PreferenceStore, ScoreComponent, UserPreferences};
use crate::store::KeyValueStore;
use crate::tracker::{JobStatus, SavedJobs, StatusTracker, StatusUpdateRecord};

/// Single-user session composing the catalog with every persisted component.
pub struct JobRadar<S: KeyValueStore + ?Sized> {
    catalog: Arc<Catalog>,
    preferences: PreferenceStore<S>,
    tracker: StatusTracker<S>,
    saved: SavedJobs<S>,
    digests: DigestGenerator<S>,
    clock: Arc<dyn Clock>,
}

/// Everything a detail view shows for one posting.
#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    pub job: JobPosting,
    #[serde(rename = "match")]
    pub result: MatchResult,
    pub breakdown: Vec<ScoreComponent>,
    pub status: JobStatus,
    pub saved: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum RadarError {
    #[error("job '{0}' is not in the catalog")]
    UnknownJob(JobId),
}

impl<S: KeyValueStore + ?Sized> JobRadar<S> {
    pub fn new(catalog: Arc<Catalog>, store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            preferences: PreferenceStore::new(Arc::clone(&store)),
            tracker: StatusTracker::new(Arc::clone(&store), Arc::clone(&clock)),
            saved: SavedJobs::new(Arc::clone(&store)),
            digests: DigestGenerator::new(Arc::clone(&catalog), store, Arc::clone(&clock)),
            catalog,
            clock,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn preferences(&self) -> Option<UserPreferences> {
        self.preferences.load()
    }

    pub fn save_preferences(&self, preferences: &UserPreferences) -> bool {
        self.preferences.save(preferences)
    }

    pub fn clear_preferences(&self) {
        self.preferences.clear();
    }

    /// Runs the listing pipeline with the stored preferences and statuses.
    pub fn listing(&self, criteria: &FilterCriteria) -> ListingResult<'_> {
        let preferences = self.preferences.load();
        let statuses = self.tracker.all_statuses();
        listing::query(&self.catalog, preferences.as_ref(), &statuses, criteria)
    }

    pub fn job_detail(&self, job_id: &str) -> Result<JobDetail, RadarError> {
        let job = self.lookup(job_id)?;
        let preferences = self.preferences.load();
        let engine = MatchEngine::new(preferences.as_ref());

        Ok(JobDetail {
            job: job.clone(),
            result: engine.score(job),
            breakdown: engine.breakdown(job),
            status: self.tracker.get_status(&job.id),
            saved: self.saved.is_saved(&job.id),
        })
    }

    /// Status of any id, catalog member or not.
    pub fn status(&self, job_id: &str) -> JobStatus {
        self.tracker.get_status(&JobId::from(job_id))
    }

    pub fn set_status(
        &self,
        job_id: &str,
        status: JobStatus,
    ) -> Result<StatusUpdateRecord, RadarError> {
        let job = self.lookup(job_id)?;
        Ok(self.tracker.set_status(job, status))
    }

    pub fn recent_updates(&self, count: usize) -> Vec<StatusUpdateRecord> {
        self.tracker.recent_updates(count)
    }

    pub fn toggle_saved(&self, job_id: &str) -> Result<bool, RadarError> {
        let job = self.lookup(job_id)?;
        Ok(self.saved.toggle(&job.id))
    }

    pub fn saved_jobs(&self) -> Vec<&JobPosting> {
        self.saved.saved_jobs(&self.catalog)
    }

    /// The daily trigger: today's digest, generated on first call of the day.
    pub fn todays_digest(&self) -> DailyDigest {
        let preferences = self.preferences.load();
        self.digests.get_or_generate(preferences.as_ref())
    }

    pub fn regenerate_digest(&self) -> DailyDigest {
        let preferences = self.preferences.load();
        self.digests.generate(preferences.as_ref())
    }

    pub fn digest_for(&self, date: NaiveDate) -> Option<DailyDigest> {
        self.digests.load_for_date(date)
    }

    pub fn has_digest(&self, date: NaiveDate) -> bool {
        self.digests.has_digest(date)
    }

    fn lookup(&self, job_id: &str) -> Result<&JobPosting, RadarError> {
        self.catalog
            .get(job_id)
            .ok_or_else(|| RadarError::UnknownJob(JobId::from(job_id)))
    }
}
