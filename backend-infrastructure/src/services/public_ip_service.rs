use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;

use backend_domain::{normalize_ip, PublicIpSource};

/// Asks a plain-text echo service such as ipify for the host's address.
pub struct HttpPublicIpSource {
    client: Client,
    url: String,
}

impl HttpPublicIpSource {
    pub fn new(url: impl Into<String>, request_timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout_seconds.max(3)))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PublicIpSource for HttpPublicIpSource {
    async fn current_ip(&self) -> Result<String> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        normalize_ip(&body).ok_or_else(|| anyhow!("ip echo returned an invalid address: {:?}", body.trim()))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn returns_trimmed_address() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("203.0.113.7\n"))
            .mount(&server)
            .await;
        let source = HttpPublicIpSource::new(format!("{}/", server.uri()), 5).expect("client");
        assert_eq!(source.current_ip().await.expect("ip"), "203.0.113.7");
    }

    #[tokio::test]
    async fn garbage_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
            .mount(&server)
            .await;
        let source = HttpPublicIpSource::new(server.uri(), 5).expect("client");
        assert!(source.current_ip().await.is_err());
    }

    #[tokio::test]
    async fn server_error_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let source = HttpPublicIpSource::new(server.uri(), 5).expect("client");
        assert!(source.current_ip().await.is_err());
    }
}
