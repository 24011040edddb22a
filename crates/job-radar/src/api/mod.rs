//! JSON HTTP surface over a shared [`JobRadar`](crate::session::JobRadar) session.

mod router;
pub mod views;

#[cfg(test)]
mod tests;

pub use router::{radar_router, SharedRadar};

use chrono::NaiveDate;

/// Parses a `YYYY-MM-DD` digest date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
