use std::collections::BTreeMap;

use crate::{AppError, AppState};
use backend_domain::{local_today, parse_date};

/// Minutes played per player on `date` (today when absent).
pub async fn playtime_for_date(
    state: &AppState,
    date: Option<&str>,
) -> Result<BTreeMap<String, i64>, AppError> {
    let date = match date.map(str::trim).filter(|value| !value.is_empty()) {
        Some(raw) => parse_date(raw).map_err(|err| AppError::BadRequest(err.to_string()))?,
        None => local_today(),
    };
    let entries = state.playtime_repo.list_for_date(date).await?;
    Ok(entries
        .into_iter()
        .map(|entry| (entry.user_name, entry.playtime_minutes))
        .collect())
}
