use crate::{AppError, AppState};
use backend_domain::PublicIpRecord;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const MAX_HISTORY_LIMIT: usize = 500;

pub async fn current_public_ip(state: &AppState) -> Result<String, AppError> {
    Ok(state.ip_source.current_ip().await?)
}

/// Newest audit rows first.
pub async fn ip_history(state: &AppState, limit: Option<usize>) -> Result<Vec<PublicIpRecord>, AppError> {
    let limit = limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    Ok(state.public_ip_repo.list_recent(limit).await?)
}
