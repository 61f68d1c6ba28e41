use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tokio::time::{timeout, Duration};
use tracing::error;

use backend_application::AppState;
use backend_domain::RconConfig;

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_rcon_config(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RconConfig>, HttpError> {
    authorize(&state, &headers)?;
    let config = state.config_repo.load_rcon_config().await?;
    Ok(Json(config))
}

pub async fn update_rcon_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RconConfig>,
) -> Result<StatusCode, HttpError> {
    authorize(&state, &headers)?;
    if payload.host.trim().is_empty() || payload.port == 0 {
        return Err(HttpError::BadRequest("host and port are required".to_string()));
    }
    state.config_repo.save_rcon_config(&payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> StatusCode {
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let timeout_duration = Duration::from_secs(timeout_secs);
    match timeout(timeout_duration, state.database.ping()).await {
        Ok(Ok(_)) => StatusCode::OK,
        Ok(Err(err)) => {
            error!("ready check failed: {}", err);
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(_) => {
            error!("ready check timeout after {}s", timeout_secs);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpError> {
    authorize(&state, &headers)?;
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    Ok((headers, payload))
}
