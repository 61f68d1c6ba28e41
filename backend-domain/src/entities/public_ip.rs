// Public IP audit log and DNS record entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PublicIpRecord {
    pub id: i64,
    pub new_ip: String,
    pub old_ip: Option<String>,
    pub changed_at: DateTime<Utc>,
}

/// An "A" record as listed by the DNS provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub proxied: bool,
}

/// Body of a record update. `ttl: 1` means "automatic" for the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecordUpdate {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

impl DnsRecordUpdate {
    pub fn pointing_at(record: &DnsRecord, ip: &str) -> Self {
        Self {
            record_type: "A".to_string(),
            name: record.name.clone(),
            content: ip.to_string(),
            ttl: 1,
            proxied: record.proxied,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    pub public_ip: String,
    pub records_checked: usize,
    pub drifted: Vec<String>,
    pub updated: Vec<String>,
    pub failed: Vec<String>,
    pub audit_recorded: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct IpHistoryQuery {
    pub limit: Option<usize>,
}
