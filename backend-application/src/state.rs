use std::sync::Arc;

use backend_domain::ports::{
    BlogRepository, ConfigRepository, DatabaseRepository, DnsProvider, GameConsole, Hypervisor,
    LogRepository, PlaytimeRepository, PublicIpRepository, PublicIpSource, TokenService,
};
use backend_domain::RuntimeConfig;
use tokio::sync::Mutex;

use crate::{Journal, Metrics};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub database: Arc<dyn DatabaseRepository>,
    pub blog_repo: Arc<dyn BlogRepository>,
    pub public_ip_repo: Arc<dyn PublicIpRepository>,
    pub playtime_repo: Arc<dyn PlaytimeRepository>,
    pub log_repo: Arc<dyn LogRepository>,
    pub config_repo: Arc<dyn ConfigRepository>,
    pub ip_source: Arc<dyn PublicIpSource>,
    pub dns_provider: Arc<dyn DnsProvider>,
    pub console: Arc<dyn GameConsole>,
    pub hypervisor: Arc<dyn Hypervisor>,
    pub token_service: Arc<dyn TokenService>,
    pub journal: Journal,
    pub metrics: Arc<Metrics>,
    /// Serialises "read last known IP, then append audit row".
    pub ip_audit_lock: Arc<Mutex<()>>,
}
