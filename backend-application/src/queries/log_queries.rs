use anyhow::anyhow;
use chrono::{Duration, Utc};

use crate::{AppError, AppState};
use backend_domain::{LogMessage, LogQuery};

pub const DEFAULT_LOG_LIMIT: usize = 200;
pub const MAX_LOG_LIMIT: usize = 1000;

/// Log rows inside the requested window, newest first.
pub async fn recent_logs(state: &AppState, query: &LogQuery) -> Result<Vec<LogMessage>, AppError> {
    let retention = state.config.log_retention_hours.max(1);
    let hours = query.hours.unwrap_or(retention).clamp(1, retention);
    let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT);
    let since = Duration::try_hours(hours)
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .ok_or_else(|| AppError::Internal(anyhow!("log window of {} hours is out of range", hours)))?;
    Ok(state.log_repo.list_since(since, limit).await?)
}
