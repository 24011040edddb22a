use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{JobId, UnknownVariant};

/// Application lifecycle stage. Jobs without a recorded status are `NotApplied`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    #[serde(rename = "Not Applied")]
    NotApplied,
    Applied,
    Rejected,
    Selected,
}

impl JobStatus {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::NotApplied,
            Self::Applied,
            Self::Rejected,
            Self::Selected,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotApplied => "Not Applied",
            Self::Applied => "Applied",
            Self::Rejected => "Rejected",
            Self::Selected => "Selected",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JobStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "notapplied" => Ok(Self::NotApplied),
            "applied" => Ok(Self::Applied),
            "rejected" => Ok(Self::Rejected),
            "selected" => Ok(Self::Selected),
            _ => Err(UnknownVariant::new("job status", value)),
        }
    }
}

/// History entry written on every status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateRecord {
    pub job_id: JobId,
    pub job_title: String,
    pub company: String,
    pub status: JobStatus,
    pub updated_at: DateTime<Utc>,
}
