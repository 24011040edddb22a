use chrono::{DateTime, Utc};

/// Short age label for a status update, e.g. `5m ago` or `Oct 3` once a week has passed.
pub fn format_relative_time(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(updated_at);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        updated_at.format("%b %-d").to_string()
    }
}
