use chrono::NaiveDate;
use job_radar::config::AppConfig;
use job_radar::digest::{Clipboard, CommandClipboard, NoClipboard};
use job_radar::error::AppError;
use job_radar::{Catalog, FileStore, JobRadar, SystemClock};
use metrics_exporter_prometheus::PrometheusHandle;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the configured catalog and opens the file-backed session around it.
pub(crate) fn open_radar(config: &AppConfig) -> Result<JobRadar<FileStore>, AppError> {
    let catalog = Catalog::from_path(&config.storage.catalog_path)?;
    let store = FileStore::open(&config.storage.data_dir)?;
    info!(
        catalog = %config.storage.catalog_path.display(),
        jobs = catalog.len(),
        data_dir = %store.dir().display(),
        "session opened"
    );
    Ok(JobRadar::new(
        Arc::new(catalog),
        Arc::new(store),
        Arc::new(SystemClock),
    ))
}

pub(crate) fn clipboard(config: &AppConfig) -> Box<dyn Clipboard> {
    match config
        .export
        .clipboard_command
        .as_deref()
        .and_then(CommandClipboard::from_command_line)
    {
        Some(command) => Box::new(command),
        None => Box::new(NoClipboard),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    job_radar::api::parse_date(raw)
}

/// Parses an optional filter value, treating `all` the same as leaving it out.
pub(crate) fn unless_all<T>(raw: Option<&str>) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|err: T::Err| AppError::InvalidInput(err.to_string())),
    }
}
