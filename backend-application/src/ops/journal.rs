use std::sync::Arc;

use backend_domain::{LogLevel, LogRepository};
use chrono::Utc;
use tracing::{error, info, warn};

/// Writes job outcomes both to `tracing` and to the persisted log table.
#[derive(Clone)]
pub struct Journal {
    repo: Arc<dyn LogRepository>,
}

impl Journal {
    pub fn new(repo: Arc<dyn LogRepository>) -> Self {
        Self { repo }
    }

    pub async fn info(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.persist(LogLevel::INFO, &message).await;
    }

    pub async fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.persist(LogLevel::WARN, &message).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        let message = message.into();
        error!("{}", message);
        self.persist(LogLevel::ERROR, &message).await;
    }

    async fn persist(&self, level: LogLevel, message: &str) {
        if let Err(err) = self.repo.insert_log(level, message, Utc::now()).await {
            warn!("failed to persist {} log message: {:#}", level, err);
        }
    }
}
