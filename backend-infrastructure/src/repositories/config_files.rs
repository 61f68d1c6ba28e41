use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use backend_domain::{ConfigRepository, RconConfig};

/// Keeps the remote console settings in a TOML file beside `config.toml`.
pub struct ConfigFileRepository {
    rcon_path: PathBuf,
    fallback: RconConfig,
}

impl ConfigFileRepository {
    /// `fallback` is returned while the file does not exist yet.
    pub fn new(rcon_path: impl Into<PathBuf>, fallback: RconConfig) -> Self {
        Self {
            rcon_path: rcon_path.into(),
            fallback,
        }
    }
}

#[async_trait]
impl ConfigRepository for ConfigFileRepository {
    async fn load_rcon_config(&self) -> anyhow::Result<RconConfig> {
        if !self.rcon_path.exists() {
            return Ok(self.fallback.clone());
        }
        let content = fs::read_to_string(&self.rcon_path).await?;
        let config: RconConfig = toml::from_str(&content)?;
        Ok(config)
    }

    async fn save_rcon_config(&self, config: &RconConfig) -> anyhow::Result<()> {
        if let Some(parent) = self.rcon_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = toml::to_string(config)?;
        fs::write(&self.rcon_path, content).await?;
        Ok(())
    }
}
