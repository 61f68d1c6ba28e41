use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::entities::{
    BlogPayload,
    BlogPost,
    LogMessage,
    PlaytimeEntry,
    PublicIpRecord,
    RconConfig,
};
use crate::value_objects::LogLevel;

#[async_trait]
pub trait DatabaseRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn list_posts(&self) -> anyhow::Result<Vec<BlogPost>>;
    async fn find_post(&self, id: i64) -> anyhow::Result<Option<BlogPost>>;
    async fn insert_post(&self, payload: &BlogPayload, now: DateTime<Utc>) -> anyhow::Result<BlogPost>;
    /// Returns false when no row matched `id`.
    async fn update_post(
        &self,
        id: i64,
        payload: &BlogPayload,
        now: DateTime<Utc>,
    ) -> anyhow::Result<bool>;
    /// Returns false when no row matched `id`.
    async fn delete_post(&self, id: i64) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait PublicIpRepository: Send + Sync {
    /// `new_ip` of the most recent audit row.
    async fn last_known_ip(&self) -> anyhow::Result<Option<String>>;
    async fn insert_record(
        &self,
        new_ip: &str,
        old_ip: Option<&str>,
        changed_at: DateTime<Utc>,
    ) -> anyhow::Result<PublicIpRecord>;
    async fn list_recent(&self, limit: usize) -> anyhow::Result<Vec<PublicIpRecord>>;
}

#[async_trait]
pub trait PlaytimeRepository: Send + Sync {
    async fn find_entry(&self, user_name: &str, date: NaiveDate) -> anyhow::Result<Option<PlaytimeEntry>>;
    async fn insert_entry(
        &self,
        user_name: &str,
        date: NaiveDate,
        minutes: i64,
        seen_at: DateTime<Utc>,
    ) -> anyhow::Result<PlaytimeEntry>;
    /// Adds `minutes` to the row and returns the new total.
    async fn add_minutes(&self, id: i64, minutes: i64, seen_at: DateTime<Utc>) -> anyhow::Result<i64>;
    async fn list_for_date(&self, date: NaiveDate) -> anyhow::Result<Vec<PlaytimeEntry>>;
}

#[async_trait]
pub trait LogRepository: Send + Sync {
    async fn insert_log(&self, level: LogLevel, message: &str, at: DateTime<Utc>) -> anyhow::Result<()>;
    async fn list_since(&self, since: DateTime<Utc>, limit: usize) -> anyhow::Result<Vec<LogMessage>>;
}

#[async_trait]
pub trait ConfigRepository: Send + Sync {
    async fn load_rcon_config(&self) -> anyhow::Result<RconConfig>;
    async fn save_rcon_config(&self, config: &RconConfig) -> anyhow::Result<()>;
}
