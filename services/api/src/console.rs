use chrono::{DateTime, Utc};
use job_radar::session::JobDetail;
use job_radar::tracker::format_relative_time;
use job_radar::{EmptyReason, JobPosting, ListingResult, StatusUpdateRecord, UserPreferences};

pub(crate) fn render_listing(listing: &ListingResult<'_>) {
    println!("Jobs ({} of {})", listing.jobs.len(), listing.total);

    if listing.jobs.is_empty() {
        match listing.empty_reason {
            Some(EmptyReason::ThresholdGate) => {
                println!("  No roles reach your match threshold. Lower it or drop --only-matches.")
            }
            Some(EmptyReason::Filters) | None => println!("  No jobs match your search."),
        }
        return;
    }

    for scored in &listing.jobs {
        let job = scored.job;
        println!(
            "  [{:>3}%] {:<10} {} - {} ({}, {}) posted {}",
            scored.result.score,
            scored.result.tier.label(),
            job.title,
            job.company,
            job.location,
            job.mode,
            posted_label(job.posted_days_ago),
        );
        println!(
            "         id: {}  salary: {}  source: {}",
            job.id, job.salary_range, job.source
        );
    }
}

pub(crate) fn render_detail(detail: &JobDetail) {
    let job = &detail.job;
    println!("{} at {}", job.title, job.company);
    println!("  Id: {}", job.id);
    println!("  Location: {} ({})", job.location, job.mode);
    println!("  Experience: {}", job.experience);
    println!("  Salary: {}", job.salary_range);
    println!("  Skills: {}", job.skills.join(", "));
    println!(
        "  Source: {}  Posted: {}",
        job.source,
        posted_label(job.posted_days_ago)
    );
    println!("  Apply: {}", job.apply_url);
    println!(
        "  Status: {}{}",
        detail.status,
        if detail.saved { "  (saved)" } else { "" }
    );
    println!(
        "  Match: {}% ({})",
        detail.result.score,
        detail.result.tier.label()
    );
    for component in &detail.breakdown {
        println!("    +{:>2} {}", component.points, component.note);
    }
    if !job.description.is_empty() {
        println!("\n{}", job.description);
    }
}

pub(crate) fn render_preferences(preferences: Option<&UserPreferences>) {
    let Some(preferences) = preferences else {
        println!("Preferences: not set. Matching is disabled until you save some.");
        return;
    };

    println!("Preferences");
    println!("  Role keywords: {}", or_dash(&preferences.role_keywords));
    println!(
        "  Locations: {}",
        or_dash(&join(preferences.preferred_locations.iter()))
    );
    println!(
        "  Modes: {}",
        or_dash(&join(preferences.preferred_modes.iter()))
    );
    println!("  Experience: {}", or_dash(&preferences.experience_level));
    println!("  Skills: {}", or_dash(&preferences.skills));
    println!("  Minimum match score: {}", preferences.min_score());
}

pub(crate) fn render_updates(updates: &[StatusUpdateRecord], now: DateTime<Utc>) {
    if updates.is_empty() {
        println!("No status updates yet.");
        return;
    }

    println!("Recent status updates");
    for update in updates {
        println!(
            "  {:<12} {} - {} ({})",
            update.status.label(),
            update.job_title,
            update.company,
            format_relative_time(update.updated_at, now),
        );
    }
}

pub(crate) fn render_saved(jobs: &[&JobPosting]) {
    if jobs.is_empty() {
        println!("No saved jobs.");
        return;
    }

    println!("Saved jobs ({})", jobs.len());
    for job in jobs {
        println!("  {} - {} [{}]", job.title, job.company, job.id);
    }
}

fn posted_label(days: u32) -> String {
    match days {
        0 => "today".to_string(),
        1 => "1 day ago".to_string(),
        n => format!("{n} days ago"),
    }
}

fn join<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
