use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::WorkMode;
use crate::store::{self, KeyValueStore};

pub(crate) const PREFERENCES_KEY: &str = "preferences";

/// Matching preferences for the single local user. Saved and loaded as one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    /// Comma-separated role keywords, e.g. `"backend, rust"`.
    pub role_keywords: String,
    pub preferred_locations: BTreeSet<String>,
    pub preferred_modes: BTreeSet<WorkMode>,
    /// Empty means unset.
    pub experience_level: String,
    /// Comma-separated skills.
    pub skills: String,
    pub min_match_score: Option<u8>,
}

impl UserPreferences {
    /// True when any matching field is set. The threshold alone does not count.
    pub fn is_configured(&self) -> bool {
        !self.role_keywords.trim().is_empty()
            || !self.preferred_locations.is_empty()
            || !self.preferred_modes.is_empty()
            || !self.experience_level.trim().is_empty()
            || !self.skills.trim().is_empty()
    }

    /// Threshold for the listing gate. An unset threshold lets every job through.
    pub fn min_score(&self) -> u8 {
        self.min_match_score.unwrap_or(0).min(100)
    }

    pub fn keyword_tokens(&self) -> Vec<String> {
        parse_list(&self.role_keywords)
    }

    pub fn skill_tokens(&self) -> Vec<String> {
        parse_list(&self.skills)
    }
}

/// Splits a comma-separated field into trimmed, lower-cased, non-empty tokens.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Loads and saves the preferences record through the session store.
pub struct PreferenceStore<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
}

impl<S: KeyValueStore + ?Sized> Clone for PreferenceStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore + ?Sized> PreferenceStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// `None` when nothing was saved or the saved record cannot be decoded.
    pub fn load(&self) -> Option<UserPreferences> {
        store::load_optional(self.store.as_ref(), PREFERENCES_KEY)
    }

    pub fn save(&self, preferences: &UserPreferences) -> bool {
        store::save(self.store.as_ref(), PREFERENCES_KEY, preferences)
    }

    pub fn clear(&self) {
        store::discard(self.store.as_ref(), PREFERENCES_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn defaults_are_unconfigured() {
        let prefs = UserPreferences::default();
        assert!(!prefs.is_configured());
        assert_eq!(prefs.min_score(), 0);
    }

    #[test]
    fn threshold_alone_does_not_configure() {
        let prefs = UserPreferences {
            min_match_score: Some(70),
            ..UserPreferences::default()
        };
        assert!(!prefs.is_configured());
        assert_eq!(prefs.min_score(), 70);
    }

    #[test]
    fn whitespace_only_fields_do_not_configure() {
        let prefs = UserPreferences {
            role_keywords: "  ".to_string(),
            skills: " ".to_string(),
            ..UserPreferences::default()
        };
        assert!(!prefs.is_configured());
    }

    #[test]
    fn list_parsing_trims_lowercases_and_drops_empties() {
        assert_eq!(
            parse_list(" Backend , RUST,, ,go "),
            vec!["backend".to_string(), "rust".to_string(), "go".to_string()]
        );
        assert!(parse_list(" , ,").is_empty());
    }

    #[test]
    fn store_round_trip_and_clear() {
        let store = PreferenceStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(store.load(), None);

        let prefs = UserPreferences {
            role_keywords: "backend".to_string(),
            preferred_modes: [WorkMode::Remote].into_iter().collect(),
            min_match_score: Some(40),
            ..UserPreferences::default()
        };
        assert!(store.save(&prefs));
        assert_eq!(store.load(), Some(prefs));

        store.clear();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn partial_records_fill_missing_fields_with_defaults() {
        let backing = Arc::new(MemoryStore::new());
        backing
            .set(PREFERENCES_KEY, r#"{"skills": "Rust"}"#)
            .expect("memory store accepts writes");

        let loaded = PreferenceStore::new(backing)
            .load()
            .expect("record decodes");
        assert_eq!(loaded.skills, "Rust");
        assert!(loaded.preferred_locations.is_empty());
        assert_eq!(loaded.min_match_score, None);
    }

    #[test]
    fn corrupt_record_loads_as_absent() {
        let backing = Arc::new(MemoryStore::new());
        backing
            .set(PREFERENCES_KEY, "{ not json")
            .expect("memory store accepts writes");

        assert_eq!(PreferenceStore::new(backing).load(), None);
    }
}
