// Minecraft remote console entities

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RconConfig {
    pub host: String,
    pub port: u16,
    pub password: String,
    pub enabled: bool,
    pub timeout_seconds: u64,
}

impl Default for RconConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 25575,
            password: String::new(),
            enabled: true,
            timeout_seconds: 5,
        }
    }
}

impl RconConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host.trim(), self.port)
    }
}

/// Text returned for a single console command, with the round trip time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleReply {
    pub command: String,
    pub body: String,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayerCounts {
    pub online: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerStatus {
    pub online: bool,
    pub latency: u64,
    pub players_online: u32,
    pub max_players: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SendMessageQuery {
    pub message: Option<String>,
}
