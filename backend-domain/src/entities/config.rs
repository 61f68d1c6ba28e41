// Runtime settings handed to the application and adapters

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub playtime_interval_seconds: u64,
    pub reconcile_interval_seconds: u64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub log_retention_hours: i64,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct CloudflareConfig {
    pub api_base: String,
    pub api_token: Option<String>,
    pub zone_id: Option<String>,
    pub public_ip_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct ProxmoxConfig {
    pub base_url: Option<String>,
    pub username: String,
    pub password: String,
    pub accept_invalid_certs: bool,
    pub request_timeout_seconds: u64,
}
