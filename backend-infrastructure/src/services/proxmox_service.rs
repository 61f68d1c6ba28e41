use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::header::COOKIE;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use backend_domain::{Hypervisor, HypervisorError, ProxmoxConfig, VmInfo, VmInventory};

#[derive(Debug, Deserialize)]
struct Data<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Ticket {
    ticket: String,
}

#[derive(Debug, Deserialize)]
struct Node {
    node: String,
}

/// Proxmox VE API client using ticket (cookie) authentication.
pub struct ProxmoxClient {
    client: Client,
    config: ProxmoxConfig,
}

impl ProxmoxClient {
    pub fn new(config: ProxmoxConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(Self { client, config })
    }

    fn api_base(&self) -> Result<String, HypervisorError> {
        self.config
            .base_url
            .as_deref()
            .map(|base| format!("{}/api2/json", base))
            .ok_or_else(|| HypervisorError::Unavailable(anyhow!("proxmox base_url not configured")))
    }

    async fn login(&self, api: &str) -> Result<String> {
        let ticket: Data<Ticket> = self
            .client
            .post(format!("{}/access/ticket", api))
            .form(&[
                ("username", self.config.username.as_str()),
                ("password", self.config.password.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(ticket.data.ticket)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: String, ticket: &str) -> Result<T> {
        let body: Data<T> = self
            .client
            .get(url)
            .header(COOKIE, format!("PVEAuthCookie={}", ticket))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.data)
    }
}

#[async_trait]
impl Hypervisor for ProxmoxClient {
    async fn vm_inventory(&self) -> Result<VmInventory, HypervisorError> {
        let api = self.api_base()?;
        let ticket = self.login(&api).await.map_err(HypervisorError::Unauthorized)?;
        let nodes: Vec<Node> = self
            .get(format!("{}/nodes", api), &ticket)
            .await
            .map_err(HypervisorError::Unavailable)?;

        let listings = join_all(nodes.into_iter().map(|node| {
            let url = format!("{}/nodes/{}/qemu", api, node.node);
            let ticket = ticket.as_str();
            async move {
                let vms = self.get::<Vec<VmInfo>>(url, ticket).await;
                (node.node, vms)
            }
        }))
        .await;

        let mut inventory = VmInventory::new();
        for (node, vms) in listings {
            match vms {
                Ok(vms) => {
                    inventory.insert(node, vms);
                }
                Err(err) => warn!(%node, "skipping node, vm listing failed: {:#}", err),
            }
        }
        Ok(inventory)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> ProxmoxClient {
        ProxmoxClient::new(ProxmoxConfig {
            base_url: Some(server.uri()),
            username: "root@pam".to_string(),
            password: "pw".to_string(),
            accept_invalid_certs: true,
            request_timeout_seconds: 5,
        })
        .expect("client")
    }

    async fn mount_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/api2/json/access/ticket"))
            .and(body_string_contains("username=root%40pam"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"ticket": "PVE:root@pam:ABC", "CSRFPreventionToken": "csrf"}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn collects_vms_per_node_and_skips_broken_nodes() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/api2/json/nodes"))
            .and(header("cookie", "PVEAuthCookie=PVE:root@pam:ABC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"node": "pve1"}, {"node": "pve2"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api2/json/nodes/pve1/qemu"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"vmid": 100, "name": "web", "status": "running"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api2/json/nodes/pve2/qemu"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let inventory = client(&server).vm_inventory().await.expect("inventory");

        assert_eq!(inventory.len(), 1);
        let vms = inventory.get("pve1").expect("pve1");
        assert_eq!(vms[0].get("status"), Some(&json!("running")));
    }

    #[tokio::test]
    async fn rejected_login_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api2/json/access/ticket"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client(&server).vm_inventory().await.expect_err("login");
        assert!(matches!(err, HypervisorError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn node_listing_failure_is_unavailable() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/api2/json/nodes"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server).vm_inventory().await.expect_err("nodes");
        assert!(matches!(err, HypervisorError::Unavailable(_)));
    }
}
