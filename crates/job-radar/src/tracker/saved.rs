use std::sync::Arc;

use crate::catalog::{Catalog, JobId, JobPosting};
use crate::store::{self, KeyValueStore};

pub(crate) const SAVED_JOBS_KEY: &str = "saved_jobs";

/// Bookmarked job ids, kept in the order they were saved.
pub struct SavedJobs<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
}

impl<S: KeyValueStore + ?Sized> SavedJobs<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<JobId> {
        store::load_or_default(self.store.as_ref(), SAVED_JOBS_KEY)
    }

    pub fn is_saved(&self, job_id: &JobId) -> bool {
        self.list().contains(job_id)
    }

    /// Saves an unsaved job or unsaves a saved one. Returns true when the job is now saved.
    pub fn toggle(&self, job_id: &JobId) -> bool {
        let mut saved = self.list();
        let now_saved = match saved.iter().position(|id| id == job_id) {
            Some(index) => {
                saved.remove(index);
                false
            }
            None => {
                saved.push(job_id.clone());
                true
            }
        };
        store::save(self.store.as_ref(), SAVED_JOBS_KEY, &saved);
        now_saved
    }

    /// Saved postings in catalog order. Ids no longer in the catalog are skipped.
    pub fn saved_jobs<'a>(&self, catalog: &'a Catalog) -> Vec<&'a JobPosting> {
        let saved = self.list();
        catalog
            .jobs()
            .iter()
            .filter(|job| saved.contains(&job.id))
            .collect()
    }
}
