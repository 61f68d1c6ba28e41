use std::collections::BTreeMap;

use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

use backend_application::commands::{minecraft_commands, playtime_commands};
use backend_application::queries::{minecraft_queries, playtime_queries};
use backend_application::AppState;
use backend_domain::{PlaytimeQuery, PlaytimeTickReport, SendMessageQuery, ServerStatus};

use crate::error::HttpError;
use crate::middleware::authorize;

#[derive(Serialize)]
pub struct PlayerListResponse {
    pub players: Vec<String>,
}

#[derive(Serialize)]
pub struct PlaytimeResponse {
    pub playtime: BTreeMap<String, i64>,
}

pub async fn server_status(State(state): State<AppState>) -> Result<Json<ServerStatus>, HttpError> {
    let status = minecraft_queries::server_status(&state).await?;
    Ok(Json(status))
}

pub async fn player_list(
    State(state): State<AppState>,
) -> Result<Json<PlayerListResponse>, HttpError> {
    let players = minecraft_queries::online_players(&state).await?;
    Ok(Json(PlayerListResponse { players }))
}

pub async fn send_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SendMessageQuery>,
) -> Result<StatusCode, HttpError> {
    authorize(&state, &headers)?;
    minecraft_commands::send_message(&state, query.message).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST variant: a url-encoded `message` field in the body wins over the
/// query string.
pub async fn send_message_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SendMessageQuery>,
    form: Option<Form<SendMessageQuery>>,
) -> Result<StatusCode, HttpError> {
    authorize(&state, &headers)?;
    let message = form
        .and_then(|Form(body)| body.message)
        .or(query.message);
    minecraft_commands::send_message(&state, message).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_playtime(
    State(state): State<AppState>,
    Query(query): Query<PlaytimeQuery>,
) -> Result<Json<PlaytimeResponse>, HttpError> {
    let playtime = playtime_queries::playtime_for_date(&state, query.date.as_deref()).await?;
    Ok(Json(PlaytimeResponse { playtime }))
}

pub async fn check_playtime(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PlaytimeTickReport>, HttpError> {
    authorize(&state, &headers)?;
    let report = playtime_commands::record_playtime_tick(&state).await?;
    Ok(Json(report))
}
