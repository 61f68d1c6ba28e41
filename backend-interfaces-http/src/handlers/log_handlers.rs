use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::queries::log_queries;
use backend_application::AppState;
use backend_domain::{LogMessage, LogQuery};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LogQuery>,
) -> Result<Json<Vec<LogMessage>>, HttpError> {
    authorize(&state, &headers)?;
    let logs = log_queries::recent_logs(&state, &query).await?;
    Ok(Json(logs))
}
