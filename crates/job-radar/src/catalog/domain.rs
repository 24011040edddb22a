use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog postings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A job posting as supplied by the external catalog. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub mode: WorkMode,
    /// Experience band such as `Fresher`, `0-1`, `1-3`, or `3-5`.
    pub experience: String,
    /// Free text; the first digit run is used as the sortable salary figure.
    pub salary_range: String,
    pub skills: Vec<String>,
    pub description: String,
    pub source: JobSource,
    pub posted_days_ago: u32,
    pub apply_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkMode {
    Remote,
    Hybrid,
    Onsite,
}

impl WorkMode {
    pub const fn ordered() -> [Self; 3] {
        [Self::Remote, Self::Hybrid, Self::Onsite]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Remote => "Remote",
            Self::Hybrid => "Hybrid",
            Self::Onsite => "Onsite",
        }
    }
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WorkMode {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "hybrid" => Ok(Self::Hybrid),
            "onsite" | "on-site" => Ok(Self::Onsite),
            _ => Err(UnknownVariant::new("work mode", value)),
        }
    }
}

/// Platform the posting was sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JobSource {
    LinkedIn,
    Naukri,
    Indeed,
}

impl JobSource {
    pub const fn ordered() -> [Self; 3] {
        [Self::LinkedIn, Self::Naukri, Self::Indeed]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LinkedIn => "LinkedIn",
            Self::Naukri => "Naukri",
            Self::Indeed => "Indeed",
        }
    }
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JobSource {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "linkedin" => Ok(Self::LinkedIn),
            "naukri" => Ok(Self::Naukri),
            "indeed" => Ok(Self::Indeed),
            _ => Err(UnknownVariant::new("job source", value)),
        }
    }
}

/// Raised when a filter or CLI value does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
