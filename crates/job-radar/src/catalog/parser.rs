use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::domain::{JobId, JobPosting, JobSource, WorkMode};

/// Parses a CSV catalog export. Skills are `;`-separated inside their column.
pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<JobPosting>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut postings = Vec::new();

    for record in csv_reader.deserialize::<CatalogRow>() {
        postings.push(record?.into_posting());
    }

    Ok(postings)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    title: String,
    company: String,
    location: String,
    mode: WorkMode,
    experience: String,
    #[serde(default)]
    salary_range: String,
    #[serde(default, deserialize_with = "split_skills")]
    skills: Vec<String>,
    #[serde(default)]
    description: String,
    source: JobSource,
    posted_days_ago: u32,
    #[serde(default)]
    apply_url: String,
}

impl CatalogRow {
    fn into_posting(self) -> JobPosting {
        JobPosting {
            id: JobId(self.id),
            title: self.title,
            company: self.company,
            location: self.location,
            mode: self.mode,
            experience: self.experience,
            salary_range: self.salary_range,
            skills: self.skills,
            description: self.description,
            source: self.source,
            posted_days_ago: self.posted_days_ago,
            apply_url: self.apply_url,
        }
    }
}

fn split_skills<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect())
}
