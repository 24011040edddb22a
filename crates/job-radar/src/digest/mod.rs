//! Daily top-ranked snapshot, generated at most once per calendar day unless regenerated.

mod clipboard;
mod export;

pub use clipboard::{copy_digest, Clipboard, ClipboardError, CommandClipboard, NoClipboard};
pub use export::{email_draft_link, render_html, render_plain_text, DIGEST_SUBJECT};

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{Catalog, JobPosting};
use crate::clock::Clock;
use crate::matching::{MatchEngine, UserPreferences};
use crate::store::{self, KeyValueStore};

pub const DIGEST_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestEntry {
    pub job: JobPosting,
    pub match_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyDigest {
    pub date: NaiveDate,
    pub jobs: Vec<DigestEntry>,
    pub generated_at: DateTime<Utc>,
}

impl DailyDigest {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Store key for the digest of `date`, e.g. `digest_2026-10-19`.
pub fn digest_key(date: NaiveDate) -> String {
    format!("digest_{}", date.format("%Y-%m-%d"))
}

/// Scores every posting and keeps the best `limit` by (score desc, days posted asc).
/// Ties on both keys keep catalog order.
pub fn rank_top(
    catalog: &Catalog,
    preferences: Option<&UserPreferences>,
    limit: usize,
) -> Vec<DigestEntry> {
    let engine = MatchEngine::new(preferences);
    let mut ranked: Vec<(&JobPosting, u8)> = catalog
        .jobs()
        .iter()
        .map(|job| (job, engine.score(job).score))
        .collect();

    ranked.sort_by(|(a_job, a_score), (b_job, b_score)| {
        b_score
            .cmp(a_score)
            .then_with(|| a_job.posted_days_ago.cmp(&b_job.posted_days_ago))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|(job, match_score)| DigestEntry {
            job: job.clone(),
            match_score,
        })
        .collect()
}

/// Produces and persists one digest per UTC calendar day.
pub struct DigestGenerator<S: KeyValueStore + ?Sized> {
    catalog: Arc<Catalog>,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: KeyValueStore + ?Sized> DigestGenerator<S> {
    pub fn new(catalog: Arc<Catalog>, store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog,
            store,
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Ranks the catalog now and overwrites today's stored digest.
    pub fn generate(&self, preferences: Option<&UserPreferences>) -> DailyDigest {
        let generated_at = self.clock.now();
        let digest = DailyDigest {
            date: generated_at.date_naive(),
            jobs: rank_top(&self.catalog, preferences, DIGEST_SIZE),
            generated_at,
        };

        let persisted = store::save(self.store.as_ref(), &digest_key(digest.date), &digest);
        info!(
            date = %digest.date,
            jobs = digest.jobs.len(),
            persisted,
            "daily digest generated"
        );
        digest
    }

    pub fn load_for_date(&self, date: NaiveDate) -> Option<DailyDigest> {
        store::load_optional(self.store.as_ref(), &digest_key(date))
    }

    pub fn has_digest(&self, date: NaiveDate) -> bool {
        self.load_for_date(date).is_some()
    }

    /// Today's stored digest when present, otherwise a freshly generated one.
    pub fn get_or_generate(&self, preferences: Option<&UserPreferences>) -> DailyDigest {
        match self.load_for_date(self.today()) {
            Some(existing) => existing,
            None => self.generate(preferences),
        }
    }
}
