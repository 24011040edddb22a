#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use job_radar::{Catalog, FixedClock, JobRadar, KeyValueStore, UserPreferences, WorkMode};

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/jobs.json")
}

pub fn fixture_catalog() -> Catalog {
    Catalog::from_path(fixture_path()).expect("fixture catalog loads")
}

pub fn morning_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    ))
}

/// Rust/backend seeker in Bengaluru, remote, 1-3 years, threshold 40.
pub fn rust_backend_preferences() -> UserPreferences {
    UserPreferences {
        role_keywords: "rust, backend".to_string(),
        preferred_locations: BTreeSet::from(["Bengaluru".to_string()]),
        preferred_modes: BTreeSet::from([WorkMode::Remote]),
        experience_level: "1-3".to_string(),
        skills: "rust, sql".to_string(),
        min_match_score: Some(40),
    }
}

pub fn radar_with<S: KeyValueStore>(store: Arc<S>, clock: Arc<FixedClock>) -> JobRadar<S> {
    JobRadar::new(Arc::new(fixture_catalog()), store, clock)
}

pub fn ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    ids.into_iter().collect()
}
