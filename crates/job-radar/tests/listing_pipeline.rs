mod common;

use std::collections::HashMap;

use common::{fixture_catalog, ids, rust_backend_preferences};
use job_radar::listing::{matches_filters, query, salary_figure};
use job_radar::{
    EmptyReason, FilterCriteria, JobId, JobSource, JobStatus, MatchEngine, SortMode,
    UserPreferences, WorkMode,
};

fn listed_ids(result: &job_radar::ListingResult<'_>) -> Vec<String> {
    result
        .jobs
        .iter()
        .map(|scored| scored.job.id.to_string())
        .collect()
}

#[test]
fn only_matches_gate_then_latest_sort_keeps_catalog_order_on_ties() {
    let catalog = fixture_catalog();
    let preferences = rust_backend_preferences();
    let statuses: HashMap<JobId, JobStatus> = HashMap::new();

    let result = query(
        &catalog,
        Some(&preferences),
        &statuses,
        &FilterCriteria {
            only_matches: true,
            ..Default::default()
        },
    );

    assert_eq!(
        listed_ids(&result).join(","),
        "J01,J05,J07,J06,J09,J02,J10,J12,J04,J14"
    );
    assert!(result.jobs.iter().all(|scored| scored.result.score >= 40));
    assert_eq!(result.total, 15);
    assert_eq!(result.empty_reason, None);
}

#[test]
fn every_listed_job_satisfies_every_active_filter() {
    let catalog = fixture_catalog();
    let mut statuses: HashMap<JobId, JobStatus> = HashMap::new();
    statuses.insert(JobId::from("J10"), JobStatus::Applied);

    let criteria = FilterCriteria {
        location: Some("Bengaluru".to_string()),
        mode: Some(WorkMode::Remote),
        source: Some(JobSource::LinkedIn),
        status: Some(JobStatus::NotApplied),
        sort: SortMode::SalaryHigh,
        ..Default::default()
    };
    let result = query(&catalog, None, &statuses, &criteria);

    assert_eq!(listed_ids(&result), ids(["J09", "J01", "J05"]));
    for scored in &result.jobs {
        assert!(matches_filters(scored.job, &statuses, &criteria));
    }
    let excluded = catalog
        .jobs()
        .iter()
        .filter(|job| !result.jobs.iter().any(|scored| scored.job.id == job.id));
    for job in excluded {
        assert!(
            !matches_filters(job, &statuses, &criteria),
            "{} should be listed",
            job.id
        );
    }
}

#[test]
fn experience_filter_combines_with_keyword_and_threshold_gate() {
    let catalog = fixture_catalog();
    let preferences = rust_backend_preferences();
    let engine = MatchEngine::new(Some(&preferences));
    let statuses: HashMap<JobId, JobStatus> = HashMap::new();

    let fresher = FilterCriteria {
        experience: Some("Fresher".to_string()),
        ..Default::default()
    };
    let fresher_only = query(&catalog, Some(&preferences), &statuses, &fresher);
    assert_eq!(listed_ids(&fresher_only), ids(["J04", "J08"]));

    let gated = FilterCriteria {
        keyword: Some("rust".to_string()),
        only_matches: true,
        ..fresher
    };
    let result = query(&catalog, Some(&preferences), &statuses, &gated);
    assert_eq!(listed_ids(&result), ids(["J04"]));

    for job in catalog.jobs() {
        let listed = result.jobs.iter().any(|scored| scored.job.id == job.id);
        let passes = matches_filters(job, &statuses, &gated) && engine.score(job).score >= 40;
        assert_eq!(listed, passes, "{} listing disagrees with filters", job.id);
    }
}

#[test]
fn salary_sorts_use_the_first_digit_run() {
    let catalog = fixture_catalog();
    let statuses: HashMap<JobId, JobStatus> = HashMap::new();

    let low = query(
        &catalog,
        None,
        &statuses,
        &FilterCriteria {
            sort: SortMode::SalaryLow,
            ..Default::default()
        },
    );
    let figures: Vec<u64> = low
        .jobs
        .iter()
        .map(|scored| salary_figure(&scored.job.salary_range))
        .collect();
    assert!(figures.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(low.jobs[0].job.id.as_str(), "J08");
    assert_eq!(salary_figure("30k/month stipend"), 30);
}

#[test]
fn keyword_searches_title_and_company_case_insensitively() {
    let catalog = fixture_catalog();
    let statuses: HashMap<JobId, JobStatus> = HashMap::new();

    let result = query(
        &catalog,
        None,
        &statuses,
        &FilterCriteria {
            keyword: Some("FERR".to_string()),
            sort: SortMode::Oldest,
            ..Default::default()
        },
    );

    assert_eq!(listed_ids(&result), ids(["J14", "J01"]));
}

#[test]
fn empty_results_explain_themselves() {
    let catalog = fixture_catalog();
    let statuses: HashMap<JobId, JobStatus> = HashMap::new();
    let strict = UserPreferences {
        min_match_score: Some(100),
        role_keywords: "haskell".to_string(),
        ..Default::default()
    };

    let gated = query(
        &catalog,
        Some(&strict),
        &statuses,
        &FilterCriteria {
            only_matches: true,
            ..Default::default()
        },
    );
    assert!(gated.is_empty());
    assert_eq!(gated.empty_reason, Some(EmptyReason::ThresholdGate));

    let filtered = query(
        &catalog,
        Some(&strict),
        &statuses,
        &FilterCriteria {
            location: Some("Atlantis".to_string()),
            ..Default::default()
        },
    );
    assert_eq!(filtered.empty_reason, Some(EmptyReason::Filters));
}

#[test]
fn unconfigured_preferences_skip_the_threshold_gate() {
    let catalog = fixture_catalog();
    let statuses: HashMap<JobId, JobStatus> = HashMap::new();
    let threshold_only = UserPreferences {
        min_match_score: Some(90),
        ..Default::default()
    };

    let result = query(
        &catalog,
        Some(&threshold_only),
        &statuses,
        &FilterCriteria {
            only_matches: true,
            ..Default::default()
        },
    );

    assert_eq!(result.jobs.len(), catalog.len());
}

#[test]
fn fixture_catalog_loads_with_pickers_in_first_seen_order() {
    let catalog = fixture_catalog();

    assert_eq!(catalog.len(), 15);
    assert_eq!(
        catalog.locations(),
        vec![
            "Bengaluru",
            "Pune",
            "Hyderabad",
            "Chennai",
            "Mumbai",
            "Delhi",
        ]
    );
    assert_eq!(
        catalog.experience_bands(),
        vec!["1-3", "0-1", "Fresher", "3-5", "5+"]
    );
}
