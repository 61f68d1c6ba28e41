// Per-day playtime counters

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlaytimeEntry {
    pub id: i64,
    pub user_name: String,
    pub date: NaiveDate,
    pub last_login: Option<DateTime<Utc>>,
    pub playtime_minutes: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaytimeQuery {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlaytimeTickReport {
    pub date: Option<NaiveDate>,
    pub players: Vec<String>,
    pub inserted: usize,
    pub updated: usize,
    pub failed: Vec<String>,
}
