use crate::cli::ServeArgs;
use crate::infra::{open_radar, AppState};
use crate::routes::with_radar_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_radar::config::AppConfig;
use job_radar::error::AppError;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use tracing::info;

pub(crate) async fn run(mut config: AppConfig, mut args: ServeArgs) -> Result<(), AppError> {
    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let radar = Arc::new(Mutex::new(open_radar(&config)?));

    let app = with_radar_routes(radar)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job radar service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
