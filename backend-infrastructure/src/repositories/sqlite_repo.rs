use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use backend_domain::{
    BlogPayload, BlogPost, BlogRepository, DatabaseRepository, DbConfig, LogLevel, LogMessage,
    LogRepository, PlaytimeEntry, PlaytimeRepository, PublicIpRecord, PublicIpRepository,
};

const SCHEMA: [&str; 6] = [
    r#"
CREATE TABLE IF NOT EXISTS blogs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL DEFAULT '',
    author TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS public_ip_updates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    new_ip TEXT NOT NULL,
    old_ip TEXT,
    changed_at TEXT NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS user_playtime (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_name TEXT NOT NULL,
    date TEXT NOT NULL,
    last_login TEXT,
    playtime_minutes INTEGER NOT NULL DEFAULT 0
)
"#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_user_playtime_user_date ON user_playtime (user_name, date)",
    r#"
CREATE TABLE IF NOT EXISTS log_messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    level TEXT NOT NULL,
    message TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_log_messages_created_at ON log_messages (created_at)",
];

/// All relational tables live in one SQLite database behind a shared pool.
#[derive(Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DbConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .with_context(|| format!("invalid database_url {}", config.database_url))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .context("failed to open database")?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl DatabaseRepository for SqliteRepo {
    async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl BlogRepository for SqliteRepo {
    async fn list_posts(&self) -> Result<Vec<BlogPost>> {
        let posts = sqlx::query_as::<_, BlogPost>(
            "SELECT id, title, content, author, created_at, updated_at FROM blogs \
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn find_post(&self, id: i64) -> Result<Option<BlogPost>> {
        let post = sqlx::query_as::<_, BlogPost>(
            "SELECT id, title, content, author, created_at, updated_at FROM blogs WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    async fn insert_post(&self, payload: &BlogPayload, now: DateTime<Utc>) -> Result<BlogPost> {
        let post = sqlx::query_as::<_, BlogPost>(
            "INSERT INTO blogs (title, content, author, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, title, content, author, created_at, updated_at",
        )
        .bind(&payload.title)
        .bind(&payload.content)
        .bind(&payload.author)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(post)
    }

    async fn update_post(&self, id: i64, payload: &BlogPayload, now: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE blogs SET title = ?, content = ?, author = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&payload.title)
        .bind(&payload.content)
        .bind(&payload.author)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_post(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PublicIpRepository for SqliteRepo {
    async fn last_known_ip(&self) -> Result<Option<String>> {
        let ip = sqlx::query_scalar::<_, String>(
            "SELECT new_ip FROM public_ip_updates ORDER BY changed_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(ip)
    }

    async fn insert_record(
        &self,
        new_ip: &str,
        old_ip: Option<&str>,
        changed_at: DateTime<Utc>,
    ) -> Result<PublicIpRecord> {
        let record = sqlx::query_as::<_, PublicIpRecord>(
            "INSERT INTO public_ip_updates (new_ip, old_ip, changed_at) VALUES (?, ?, ?) \
             RETURNING id, new_ip, old_ip, changed_at",
        )
        .bind(new_ip)
        .bind(old_ip)
        .bind(changed_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<PublicIpRecord>> {
        let records = sqlx::query_as::<_, PublicIpRecord>(
            "SELECT id, new_ip, old_ip, changed_at FROM public_ip_updates \
             ORDER BY changed_at DESC, id DESC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}

#[async_trait]
impl PlaytimeRepository for SqliteRepo {
    async fn find_entry(&self, user_name: &str, date: NaiveDate) -> Result<Option<PlaytimeEntry>> {
        let entry = sqlx::query_as::<_, PlaytimeEntry>(
            "SELECT id, user_name, date, last_login, playtime_minutes FROM user_playtime \
             WHERE user_name = ? AND date = ?",
        )
        .bind(user_name)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn insert_entry(
        &self,
        user_name: &str,
        date: NaiveDate,
        minutes: i64,
        seen_at: DateTime<Utc>,
    ) -> Result<PlaytimeEntry> {
        let entry = sqlx::query_as::<_, PlaytimeEntry>(
            "INSERT INTO user_playtime (user_name, date, last_login, playtime_minutes) \
             VALUES (?, ?, ?, ?) \
             RETURNING id, user_name, date, last_login, playtime_minutes",
        )
        .bind(user_name)
        .bind(date)
        .bind(seen_at)
        .bind(minutes)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn add_minutes(&self, id: i64, minutes: i64, seen_at: DateTime<Utc>) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            "UPDATE user_playtime SET playtime_minutes = playtime_minutes + ?, last_login = ? \
             WHERE id = ? RETURNING playtime_minutes",
        )
        .bind(minutes)
        .bind(seen_at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        total.with_context(|| format!("playtime row {} not found", id))
    }

    async fn list_for_date(&self, date: NaiveDate) -> Result<Vec<PlaytimeEntry>> {
        let entries = sqlx::query_as::<_, PlaytimeEntry>(
            "SELECT id, user_name, date, last_login, playtime_minutes FROM user_playtime \
             WHERE date = ? ORDER BY user_name",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}

#[async_trait]
impl LogRepository for SqliteRepo {
    async fn insert_log(&self, level: LogLevel, message: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("INSERT INTO log_messages (level, message, created_at) VALUES (?, ?, ?)")
            .bind(level.as_str())
            .bind(message)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_since(&self, since: DateTime<Utc>, limit: usize) -> Result<Vec<LogMessage>> {
        let logs = sqlx::query_as::<_, LogMessage>(
            "SELECT id, level, message, created_at FROM log_messages \
             WHERE created_at >= ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(since)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }
}
