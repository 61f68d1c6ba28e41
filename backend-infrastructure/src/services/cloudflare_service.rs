use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use backend_domain::{CloudflareConfig, DnsProvider, DnsRecord, DnsRecordUpdate};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Cloudflare v4 client scoped to one zone.
pub struct CloudflareDnsProvider {
    client: Client,
    config: CloudflareConfig,
}

impl CloudflareDnsProvider {
    pub fn new(config: CloudflareConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
            .build()?;
        Ok(Self { client, config })
    }

    fn zone_url(&self) -> Result<String> {
        let zone_id = self
            .config
            .zone_id
            .as_deref()
            .ok_or_else(|| anyhow!("cloudflare zone_id not configured"))?;
        Ok(format!("{}/zones/{}/dns_records", self.config.api_base, zone_id))
    }

    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self
            .config
            .api_token
            .as_deref()
            .ok_or_else(|| anyhow!("cloudflare api_token not configured"))?;
        Ok(request.bearer_auth(token))
    }
}

async fn read_envelope<T: DeserializeOwned>(request: RequestBuilder) -> Result<Option<T>> {
    let envelope: Envelope<T> = request.send().await?.error_for_status()?.json().await?;
    if !envelope.success {
        let detail = envelope
            .errors
            .iter()
            .map(|err| format!("{} {}", err.code, err.message))
            .collect::<Vec<_>>()
            .join("; ");
        bail!("cloudflare request unsuccessful: {}", detail);
    }
    Ok(envelope.result)
}

#[async_trait]
impl DnsProvider for CloudflareDnsProvider {
    async fn list_a_records(&self) -> Result<Vec<DnsRecord>> {
        let request = self.client.get(self.zone_url()?).query(&[("type", "A")]);
        let records = read_envelope::<Vec<DnsRecord>>(self.authorize(request)?).await?;
        Ok(records.unwrap_or_default())
    }

    async fn update_record(&self, record: &DnsRecord, ip: &str) -> Result<()> {
        let url = format!("{}/{}", self.zone_url()?, record.id);
        let request = self
            .client
            .patch(url)
            .json(&DnsRecordUpdate::pointing_at(record, ip));
        read_envelope::<serde_json::Value>(self.authorize(request)?).await?;
        Ok(())
    }
}
