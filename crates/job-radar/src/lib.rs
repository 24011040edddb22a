//! Matching, ranking, and daily digest engine for a personal job search.
//!
//! The crate scores a static job catalog against the user's preferences, filters and sorts
//! listings, tracks application status with a bounded history, and produces one ranked digest
//! per calendar day. All session state lives behind the [`store::KeyValueStore`] seam.

pub mod api;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod digest;
pub mod error;
pub mod listing;
pub mod matching;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod tracker;

pub use catalog::{Catalog, CatalogError, JobId, JobPosting, JobSource, WorkMode};
pub use clock::{Clock, FixedClock, SystemClock};
pub use digest::{DailyDigest, DigestEntry, DigestGenerator};
pub use listing::{EmptyReason, FilterCriteria, ListingResult, ScoredJob, SortMode, StatusLookup};
pub use matching::{MatchEngine, MatchResult, MatchTier, PreferenceStore, UserPreferences};
pub use session::{JobDetail, JobRadar, RadarError};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use tracker::{JobStatus, SavedJobs, StatusTracker, StatusUpdateRecord};
