use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use backend_application::commands::public_ip_commands;
use backend_application::queries::public_ip_queries;
use backend_application::AppState;
use backend_domain::{IpHistoryQuery, PublicIpRecord, ReconcileReport};

use crate::error::HttpError;
use crate::middleware::authorize;

#[derive(Serialize)]
pub struct CurrentIp {
    pub ip: String,
}

pub async fn current_public_ip(State(state): State<AppState>) -> Result<Json<CurrentIp>, HttpError> {
    let ip = public_ip_queries::current_public_ip(&state).await?;
    Ok(Json(CurrentIp { ip }))
}

pub async fn ip_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<IpHistoryQuery>,
) -> Result<Json<Vec<PublicIpRecord>>, HttpError> {
    authorize(&state, &headers)?;
    let history = public_ip_queries::ip_history(&state, query.limit).await?;
    Ok(Json(history))
}

pub async fn reconcile_now(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ReconcileReport>, HttpError> {
    authorize(&state, &headers)?;
    let report = public_ip_commands::reconcile_public_ip(&state).await?;
    Ok(Json(report))
}
