use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use backend_application::commands::auth_commands;
use backend_application::AppState;
use backend_domain::{LoginRequest, LoginResponse};

use crate::error::HttpError;
use crate::middleware::authorize;

#[derive(Serialize)]
pub struct AuthCheck {
    pub authenticated: bool,
    pub message: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let response = auth_commands::login(&state, payload)
        .await
        .map_err(|err| match err {
            backend_application::AppError::Unauthorized => {
                HttpError::Unauthorized("invalid username or password")
            }
            other => other.into(),
        })?;
    Ok(Json(response))
}

pub async fn check_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AuthCheck>, HttpError> {
    let claims = authorize(&state, &headers)?;
    Ok(Json(AuthCheck {
        authenticated: true,
        message: format!("authenticated as {}", claims.username),
    }))
}
