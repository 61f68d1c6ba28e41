use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::warn;

use backend_application::{AppState, Journal, Metrics};
use backend_domain::{ConfigRepository, DatabaseRepository};
use backend_infrastructure::{
    AppConfig, BackgroundJobs, CloudflareDnsProvider, ConfigFileRepository, HttpPublicIpSource,
    JwtTokenService, ProxmoxClient, RconConsole, SqliteRepo,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config_path: &str) -> Result<Self> {
        let config = AppConfig::load(config_path).await?;
        Self::from_config(&config).await
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let cloudflare = config.to_cloudflare_config();

        let repo = Arc::new(SqliteRepo::connect(&config.to_db_config()).await?);
        repo.ensure_schema().await?;

        let config_repo: Arc<dyn ConfigRepository> = Arc::new(ConfigFileRepository::new(
            config.rcon_config_path(),
            config.rcon.clone(),
        ));

        if runtime_config.admin_username.is_none() || runtime_config.admin_password.is_none() {
            warn!("admin credentials not configured, protected endpoints will reject every request");
        }
        if cloudflare.api_token.is_none() || cloudflare.zone_id.is_none() {
            warn!("cloudflare credentials not configured, dns reconciliation will fail");
        }

        let ip_source = Arc::new(HttpPublicIpSource::new(
            cloudflare.public_ip_url.clone(),
            cloudflare.request_timeout_seconds,
        )?);
        let dns_provider = Arc::new(CloudflareDnsProvider::new(cloudflare)?);
        let hypervisor = Arc::new(ProxmoxClient::new(config.to_proxmox_config())?);

        let state = AppState {
            config: runtime_config,
            database: repo.clone(),
            blog_repo: repo.clone(),
            public_ip_repo: repo.clone(),
            playtime_repo: repo.clone(),
            log_repo: repo.clone(),
            console: Arc::new(RconConsole::new(config_repo.clone())),
            config_repo,
            ip_source,
            dns_provider,
            hypervisor,
            token_service: Arc::new(JwtTokenService::new(&config.to_auth_config())),
            journal: Journal::new(repo),
            metrics: Arc::new(Metrics::default()),
            ip_audit_lock: Arc::new(Mutex::new(())),
        };

        Ok(Self { state })
    }

    pub fn spawn_jobs(&self) -> BackgroundJobs {
        BackgroundJobs::spawn(self.state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wires_state_from_config() {
        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            admin_username: Some("admin".to_string()),
            admin_password: Some("pw".to_string()),
            jwt_secret: Some("s3cret".to_string()),
            ..AppConfig::default()
        };
        let context = AppContext::from_config(&config).await.expect("context");
        context.state.database.ping().await.expect("ping");

        let token = context.state.token_service.issue("admin").expect("issue");
        let claims = context.state.token_service.verify(&token).expect("verify");
        assert_eq!(claims.username, "admin");
        assert_eq!(context.state.config.reconcile_interval_seconds, 60);
    }
}
