use async_trait::async_trait;

use crate::entities::{Claims, ConsoleReply, DnsRecord, HypervisorError, VmInventory};

#[async_trait]
pub trait PublicIpSource: Send + Sync {
    async fn current_ip(&self) -> anyhow::Result<String>;
}

#[async_trait]
pub trait DnsProvider: Send + Sync {
    async fn list_a_records(&self) -> anyhow::Result<Vec<DnsRecord>>;
    async fn update_record(&self, record: &DnsRecord, ip: &str) -> anyhow::Result<()>;
}

/// Remote console of the game server. Every call opens its own connection,
/// runs `commands` in order and closes it.
#[async_trait]
pub trait GameConsole: Send + Sync {
    async fn run(&self, commands: &[String]) -> anyhow::Result<Vec<ConsoleReply>>;
}

#[async_trait]
pub trait Hypervisor: Send + Sync {
    async fn vm_inventory(&self) -> Result<VmInventory, HypervisorError>;
}

pub trait TokenService: Send + Sync {
    fn issue(&self, username: &str) -> anyhow::Result<String>;
    fn verify(&self, token: &str) -> anyhow::Result<Claims>;
}
