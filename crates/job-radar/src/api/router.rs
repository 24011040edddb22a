use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::parse_date;
use super::views::{
    DigestView, ListingView, PreferencesView, SavedToggleView, StatusUpdateView, StatusView,
};
use crate::catalog::JobId;
use crate::digest::{email_draft_link, render_html, render_plain_text};
use crate::error::AppError;
use crate::listing::FilterCriteria;
use crate::matching::UserPreferences;
use crate::session::JobRadar;
use crate::store::KeyValueStore;
use crate::tracker::{JobStatus, DEFAULT_RECENT_UPDATES};

/// One session shared by every request; the mutex keeps each user action a single writer.
pub type SharedRadar<S> = Arc<Mutex<JobRadar<S>>>;

/// Router builder exposing listing, status, preference, and digest endpoints.
pub fn radar_router<S>(radar: SharedRadar<S>) -> Router
where
    S: KeyValueStore + 'static,
{
    Router::new()
        .route("/api/v1/jobs", get(list_jobs_handler::<S>))
        .route("/api/v1/jobs/:job_id", get(job_detail_handler::<S>))
        .route(
            "/api/v1/jobs/:job_id/status",
            get(get_status_handler::<S>).put(set_status_handler::<S>),
        )
        .route(
            "/api/v1/jobs/:job_id/saved",
            post(toggle_saved_handler::<S>),
        )
        .route("/api/v1/saved", get(saved_jobs_handler::<S>))
        .route(
            "/api/v1/preferences",
            get(get_preferences_handler::<S>)
                .put(put_preferences_handler::<S>)
                .delete(clear_preferences_handler::<S>),
        )
        .route("/api/v1/status/recent", get(recent_updates_handler::<S>))
        .route("/api/v1/digest", get(todays_digest_handler::<S>))
        .route(
            "/api/v1/digest/regenerate",
            post(regenerate_digest_handler::<S>),
        )
        .route("/api/v1/digest/:date", get(digest_for_date_handler::<S>))
        .route(
            "/api/v1/digest/:date/export",
            get(export_digest_handler::<S>),
        )
        .with_state(radar)
}

fn lock<S: KeyValueStore>(radar: &SharedRadar<S>) -> MutexGuard<'_, JobRadar<S>> {
    radar.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) async fn list_jobs_handler<S>(
    State(radar): State<SharedRadar<S>>,
    Query(criteria): Query<FilterCriteria>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let radar = lock(&radar);
    let result = radar.listing(&criteria);
    Json(ListingView::from(&result)).into_response()
}

pub(crate) async fn job_detail_handler<S>(
    State(radar): State<SharedRadar<S>>,
    Path(job_id): Path<String>,
) -> Result<Response, AppError>
where
    S: KeyValueStore + 'static,
{
    let detail = lock(&radar).job_detail(&job_id)?;
    Ok(Json(detail).into_response())
}

pub(crate) async fn get_status_handler<S>(
    State(radar): State<SharedRadar<S>>,
    Path(job_id): Path<String>,
) -> Result<Response, AppError>
where
    S: KeyValueStore + 'static,
{
    let radar = lock(&radar);
    let job = radar
        .catalog()
        .get(&job_id)
        .ok_or_else(|| AppError::UnknownJob(job_id.clone()))?;
    let view = StatusView {
        job_id: job.id.clone(),
        status: radar.status(&job_id),
    };
    Ok(Json(view).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    pub(crate) status: JobStatus,
}

pub(crate) async fn set_status_handler<S>(
    State(radar): State<SharedRadar<S>>,
    Path(job_id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Response, AppError>
where
    S: KeyValueStore + 'static,
{
    let radar = lock(&radar);
    let record = radar.set_status(&job_id, request.status)?;
    let view = StatusUpdateView::new(record, radar.now());
    Ok(Json(view).into_response())
}

pub(crate) async fn toggle_saved_handler<S>(
    State(radar): State<SharedRadar<S>>,
    Path(job_id): Path<String>,
) -> Result<Response, AppError>
where
    S: KeyValueStore + 'static,
{
    let saved = lock(&radar).toggle_saved(&job_id)?;
    let view = SavedToggleView {
        job_id: JobId(job_id),
        saved,
    };
    Ok(Json(view).into_response())
}

pub(crate) async fn saved_jobs_handler<S>(State(radar): State<SharedRadar<S>>) -> Response
where
    S: KeyValueStore + 'static,
{
    let radar = lock(&radar);
    let jobs = radar.saved_jobs();
    Json(json!({ "count": jobs.len(), "jobs": jobs })).into_response()
}

pub(crate) async fn get_preferences_handler<S>(State(radar): State<SharedRadar<S>>) -> Response
where
    S: KeyValueStore + 'static,
{
    let stored = lock(&radar).preferences();
    Json(PreferencesView::from(stored)).into_response()
}

pub(crate) async fn put_preferences_handler<S>(
    State(radar): State<SharedRadar<S>>,
    Json(preferences): Json<UserPreferences>,
) -> Result<Response, AppError>
where
    S: KeyValueStore + 'static,
{
    if preferences.min_match_score.is_some_and(|score| score > 100) {
        return Err(AppError::InvalidInput(
            "min_match_score must be between 0 and 100".to_string(),
        ));
    }

    let persisted = lock(&radar).save_preferences(&preferences);
    let view = PreferencesView::from(Some(preferences));
    let payload = json!({
        "persisted": persisted,
        "configured": view.configured,
        "preferences": view.preferences,
    });
    Ok(Json(payload).into_response())
}

pub(crate) async fn clear_preferences_handler<S>(State(radar): State<SharedRadar<S>>) -> Response
where
    S: KeyValueStore + 'static,
{
    lock(&radar).clear_preferences();
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecentQuery {
    pub(crate) limit: Option<usize>,
}

pub(crate) async fn recent_updates_handler<S>(
    State(radar): State<SharedRadar<S>>,
    Query(query): Query<RecentQuery>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let radar = lock(&radar);
    let now = radar.now();
    let updates: Vec<StatusUpdateView> = radar
        .recent_updates(query.limit.unwrap_or(DEFAULT_RECENT_UPDATES))
        .into_iter()
        .map(|record| StatusUpdateView::new(record, now))
        .collect();
    Json(json!({ "updates": updates })).into_response()
}

pub(crate) async fn todays_digest_handler<S>(State(radar): State<SharedRadar<S>>) -> Response
where
    S: KeyValueStore + 'static,
{
    let digest = lock(&radar).todays_digest();
    Json(DigestView::from(digest)).into_response()
}

pub(crate) async fn regenerate_digest_handler<S>(State(radar): State<SharedRadar<S>>) -> Response
where
    S: KeyValueStore + 'static,
{
    let digest = lock(&radar).regenerate_digest();
    Json(DigestView::from(digest)).into_response()
}

pub(crate) async fn digest_for_date_handler<S>(
    State(radar): State<SharedRadar<S>>,
    Path(date): Path<String>,
) -> Result<Response, AppError>
where
    S: KeyValueStore + 'static,
{
    let date = parse_date(&date).map_err(AppError::InvalidInput)?;
    let digest = lock(&radar)
        .digest_for(date)
        .ok_or(AppError::DigestNotFound(date))?;
    Ok(Json(DigestView::from(digest)).into_response())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ExportFormat {
    #[default]
    Text,
    Html,
    Mailto,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExportQuery {
    #[serde(default)]
    pub(crate) format: ExportFormat,
}

pub(crate) async fn export_digest_handler<S>(
    State(radar): State<SharedRadar<S>>,
    Path(date): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError>
where
    S: KeyValueStore + 'static,
{
    let date = parse_date(&date).map_err(AppError::InvalidInput)?;
    let digest = lock(&radar)
        .digest_for(date)
        .ok_or(AppError::DigestNotFound(date))?;

    let (content_type, body) = match query.format {
        ExportFormat::Text => ("text/plain; charset=utf-8", render_plain_text(&digest)),
        ExportFormat::Html => ("text/html; charset=utf-8", render_html(&digest)),
        ExportFormat::Mailto => ("text/plain; charset=utf-8", email_draft_link(&digest)),
    };
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response())
}
