use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::api::{radar_router, SharedRadar};
use crate::catalog::{Catalog, JobId, JobPosting, JobSource, WorkMode};
use crate::clock::FixedClock;
use crate::session::JobRadar;
use crate::store::MemoryStore;

pub(super) fn posting(id: &str, title: &str, mode: WorkMode, days: u32) -> JobPosting {
    JobPosting {
        id: JobId::from(id),
        title: title.to_string(),
        company: "Ferrous".to_string(),
        location: "Bengaluru".to_string(),
        mode,
        experience: "1-3".to_string(),
        salary_range: "18-25 LPA".to_string(),
        skills: vec!["Rust".to_string()],
        description: "Backend services".to_string(),
        source: JobSource::LinkedIn,
        posted_days_ago: days,
        apply_url: format!("https://jobs.example.com/{id}"),
    }
}

pub(super) fn catalog() -> Catalog {
    Catalog::new(vec![
        posting("rust-1", "Rust Engineer", WorkMode::Remote, 1),
        posting("go-1", "Go Engineer", WorkMode::Hybrid, 4),
        posting("ui-1", "Designer", WorkMode::Onsite, 0),
    ])
    .expect("unique ids")
}

pub(super) fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    ))
}

pub(super) fn shared_radar() -> SharedRadar<MemoryStore> {
    let radar = JobRadar::new(Arc::new(catalog()), Arc::new(MemoryStore::new()), clock());
    Arc::new(Mutex::new(radar))
}

pub(super) fn router() -> (Router, SharedRadar<MemoryStore>) {
    let radar = shared_radar();
    (radar_router(radar.clone()), radar)
}

pub(super) fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) fn json_request(method: Method, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(payload).expect("payload serializes"),
        ))
        .expect("request builds")
}

pub(super) async fn read_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_str(&read_body(response).await).expect("json payload")
}
