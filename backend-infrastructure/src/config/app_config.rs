use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{
    AuthConfig, CloudflareConfig, DbConfig, ProxmoxConfig, RconConfig, RuntimeConfig,
};

pub const DEFAULT_CONFIG_PATH: &str = "./config.toml";
/// One year; also keeps every hour count inside chrono's date range.
pub const MAX_HOURS_SETTING: i64 = 24 * 365;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: i64,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub cloudflare_api_base: String,
    pub cloudflare_api_token: Option<String>,
    pub cloudflare_zone_id: Option<String>,
    pub public_ip_url: String,
    pub proxmox_base_url: Option<String>,
    pub proxmox_username: String,
    pub proxmox_password: String,
    pub proxmox_accept_invalid_certs: bool,
    pub playtime_interval_seconds: u64,
    pub reconcile_interval_seconds: u64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub log_retention_hours: i64,
    pub rcon_config_path: String,
    /// Used until `rcon.toml` has been written.
    pub rcon: RconConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            database_url: "sqlite://site.db".to_string(),
            database_max_connections: 5,
            jwt_secret: None,
            token_ttl_hours: 24 * 7,
            admin_username: None,
            admin_password: None,
            cloudflare_api_base: "https://api.cloudflare.com/client/v4".to_string(),
            cloudflare_api_token: None,
            cloudflare_zone_id: None,
            public_ip_url: "https://api.ipify.org?format=text".to_string(),
            proxmox_base_url: None,
            proxmox_username: "root@pam".to_string(),
            proxmox_password: String::new(),
            proxmox_accept_invalid_certs: true,
            playtime_interval_seconds: 600,
            reconcile_interval_seconds: 60,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            log_retention_hours: 24,
            rcon_config_path: "./rcon.toml".to_string(),
            rcon: RconConfig::default(),
        }
    }
}

impl AppConfig {
    pub async fn load(path: &str) -> Result<Self> {
        let file_path = Path::new(path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str(&content)
                .map_err(|err| anyhow!("failed to parse {}: {}", file_path.display(), err))?
        } else {
            warn!("{} not found, using defaults", file_path.display());
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        for value in [
            &mut self.jwt_secret,
            &mut self.admin_username,
            &mut self.admin_password,
            &mut self.cloudflare_api_token,
            &mut self.cloudflare_zone_id,
            &mut self.proxmox_base_url,
        ] {
            if value.as_deref().is_some_and(|text| text.trim().is_empty()) {
                *value = None;
            }
        }
        self.cloudflare_api_base = self.cloudflare_api_base.trim_end_matches('/').to_string();
        if let Some(url) = &mut self.proxmox_base_url {
            *url = url.trim_end_matches('/').to_string();
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.rcon_config_path = resolve_path(base, &self.rcon_config_path);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.database_url.trim().is_empty() {
            return Err(anyhow!("database_url must not be empty"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.playtime_interval_seconds == 0 || self.reconcile_interval_seconds == 0 {
            return Err(anyhow!("job intervals must be greater than 0"));
        }
        if !(1..=MAX_HOURS_SETTING).contains(&self.log_retention_hours) {
            return Err(anyhow!(
                "log_retention_hours must be between 1 and {}",
                MAX_HOURS_SETTING
            ));
        }
        if !(1..=MAX_HOURS_SETTING).contains(&self.token_ttl_hours) {
            return Err(anyhow!(
                "token_ttl_hours must be between 1 and {}",
                MAX_HOURS_SETTING
            ));
        }
        let admin_configured = self.admin_username.is_some() || self.admin_password.is_some();
        if admin_configured && self.jwt_secret.is_none() {
            return Err(anyhow!("jwt_secret is required when admin credentials are set"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            admin_username: self.admin_username.clone(),
            admin_password: self.admin_password.clone(),
            playtime_interval_seconds: self.playtime_interval_seconds,
            reconcile_interval_seconds: self.reconcile_interval_seconds,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            log_retention_hours: self.log_retention_hours,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            database_url: self.database_url.clone(),
            max_connections: self.database_max_connections.max(1),
        }
    }

    pub fn to_auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            token_ttl_hours: self.token_ttl_hours,
        }
    }

    pub fn to_cloudflare_config(&self) -> CloudflareConfig {
        CloudflareConfig {
            api_base: self.cloudflare_api_base.clone(),
            api_token: self.cloudflare_api_token.clone(),
            zone_id: self.cloudflare_zone_id.clone(),
            public_ip_url: self.public_ip_url.clone(),
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_proxmox_config(&self) -> ProxmoxConfig {
        ProxmoxConfig {
            base_url: self.proxmox_base_url.clone(),
            username: self.proxmox_username.clone(),
            password: self.proxmox_password.clone(),
            accept_invalid_certs: self.proxmox_accept_invalid_certs,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn rcon_config_path(&self) -> PathBuf {
        PathBuf::from(&self.rcon_config_path)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("SITE_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("SITE_DATABASE_URL") {
            self.database_url = value;
        }
        if let Some(value) = lookup("SITE_DATABASE_MAX_CONNECTIONS") {
            self.database_max_connections = value.parse().unwrap_or(self.database_max_connections);
        }
        if let Some(value) = lookup("SITE_JWT_SECRET") {
            self.jwt_secret = Some(value);
        }
        if let Some(value) = lookup("SITE_TOKEN_TTL_HOURS") {
            self.token_ttl_hours = value.parse().unwrap_or(self.token_ttl_hours);
        }
        if let Some(value) = lookup("SITE_ADMIN_USERNAME") {
            self.admin_username = Some(value);
        }
        if let Some(value) = lookup("SITE_ADMIN_PASSWORD") {
            self.admin_password = Some(value);
        }
        if let Some(value) = lookup("SITE_CLOUDFLARE_API_BASE") {
            self.cloudflare_api_base = value;
        }
        if let Some(value) = lookup("SITE_CLOUDFLARE_API_TOKEN") {
            self.cloudflare_api_token = Some(value);
        }
        if let Some(value) = lookup("SITE_CLOUDFLARE_ZONE_ID") {
            self.cloudflare_zone_id = Some(value);
        }
        if let Some(value) = lookup("SITE_PUBLIC_IP_URL") {
            self.public_ip_url = value;
        }
        if let Some(value) = lookup("SITE_PROXMOX_BASE_URL") {
            self.proxmox_base_url = Some(value);
        }
        if let Some(value) = lookup("SITE_PROXMOX_USERNAME") {
            self.proxmox_username = value;
        }
        if let Some(value) = lookup("SITE_PROXMOX_PASSWORD") {
            self.proxmox_password = value;
        }
        if let Some(value) = lookup("SITE_PROXMOX_ACCEPT_INVALID_CERTS") {
            self.proxmox_accept_invalid_certs =
                value.parse().unwrap_or(self.proxmox_accept_invalid_certs);
        }
        if let Some(value) = lookup("SITE_PLAYTIME_INTERVAL_SECONDS") {
            self.playtime_interval_seconds = value.parse().unwrap_or(self.playtime_interval_seconds);
        }
        if let Some(value) = lookup("SITE_RECONCILE_INTERVAL_SECONDS") {
            self.reconcile_interval_seconds =
                value.parse().unwrap_or(self.reconcile_interval_seconds);
        }
        if let Some(value) = lookup("SITE_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Some(value) = lookup("SITE_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = lookup("SITE_LOG_RETENTION_HOURS") {
            self.log_retention_hours = value.parse().unwrap_or(self.log_retention_hours);
        }
        if let Some(value) = lookup("SITE_RCON_CONFIG_PATH") {
            self.rcon_config_path = value;
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn parses_toml_with_rcon_table() {
        let config: AppConfig = toml::from_str(
            r#"
bind_addr = "0.0.0.0:9000"
cloudflare_zone_id = "zone-1"

[rcon]
host = "mc.local"
password = "secret"
"#,
        )
        .expect("parse");
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.cloudflare_zone_id.as_deref(), Some("zone-1"));
        assert_eq!(config.rcon.host, "mc.local");
        assert_eq!(config.rcon.port, 25575);
        assert_eq!(config.reconcile_interval_seconds, 60);
    }

    #[test]
    fn env_overrides_take_precedence() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SITE_BIND_ADDR", "127.0.0.1:9999"),
            ("SITE_PLAYTIME_INTERVAL_SECONDS", "300"),
            ("SITE_REQUEST_TIMEOUT_SECONDS", "not-a-number"),
            ("SITE_ADMIN_USERNAME", "root"),
        ]);
        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|value| value.to_string()));
        assert_eq!(config.bind_addr, "127.0.0.1:9999");
        assert_eq!(config.playtime_interval_seconds, 300);
        assert_eq!(config.request_timeout_seconds, 15);
        assert_eq!(config.admin_username.as_deref(), Some("root"));
    }

    #[test]
    fn normalize_drops_blank_secrets() {
        let mut config = AppConfig {
            jwt_secret: Some("  ".to_string()),
            cloudflare_api_base: "https://api.example.com/v4/".to_string(),
            ..AppConfig::default()
        };
        config.normalize();
        assert!(config.jwt_secret.is_none());
        assert_eq!(config.cloudflare_api_base, "https://api.example.com/v4");
    }

    #[test]
    fn admin_without_jwt_secret_is_rejected() {
        let config = AppConfig {
            admin_username: Some("admin".to_string()),
            admin_password: Some("pw".to_string()),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            jwt_secret: Some("s3cret".to_string()),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = AppConfig {
            reconcile_interval_seconds: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn hour_settings_are_bounded() {
        let config = AppConfig {
            log_retention_hours: 10_000_000_000,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            token_ttl_hours: i64::MAX,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            log_retention_hours: MAX_HOURS_SETTING,
            token_ttl_hours: MAX_HOURS_SETTING,
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn relative_rcon_path_follows_config_dir() {
        let mut config = AppConfig::default();
        config.resolve_paths(Some(Path::new("/etc/site")));
        assert_eq!(config.rcon_config_path(), PathBuf::from("/etc/site/./rcon.toml"));
    }
}
