//! The static, ordered job catalog supplied at process start.

mod domain;
mod parser;

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

pub use domain::{JobId, JobPosting, JobSource, UnknownVariant, WorkMode};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid catalog JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate job id '{0}' in catalog")]
    DuplicateId(String),
    #[error("unsupported catalog format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Immutable, ordered list of postings. Catalog order is the tie-break for every sort.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    jobs: Vec<JobPosting>,
}

impl Catalog {
    pub fn new(jobs: Vec<JobPosting>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for job in &jobs {
            if !seen.insert(job.id.as_str()) {
                return Err(CatalogError::DuplicateId(job.id.0.clone()));
            }
        }
        Ok(Self { jobs })
    }

    /// Loads a `.json` array or a `.csv` export, chosen by file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Self::from_json_reader(std::fs::File::open(path)?),
            Some("csv") => Self::from_csv_reader(std::fs::File::open(path)?),
            _ => Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let jobs: Vec<JobPosting> = serde_json::from_reader(reader)?;
        Self::new(jobs)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Self::new(parser::parse_csv(reader)?)
    }

    pub fn jobs(&self) -> &[JobPosting] {
        &self.jobs
    }

    pub fn get(&self, id: &str) -> Option<&JobPosting> {
        self.jobs.iter().find(|job| job.id.as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Distinct locations in first-seen order, for filter pickers.
    pub fn locations(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.jobs
            .iter()
            .map(|job| job.location.as_str())
            .filter(|location| seen.insert(*location))
            .collect()
    }

    /// Distinct experience bands in first-seen order.
    pub fn experience_bands(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.jobs
            .iter()
            .map(|job| job.experience.as_str())
            .filter(|band| seen.insert(*band))
            .collect()
    }
}
