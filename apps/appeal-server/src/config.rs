use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub listen_port: u16,
    pub storage_dir: PathBuf,
    pub api_key: String,
    pub base_path: String,
}

impl ServerConfig {
    /// Defaults, then `/etc/appeal/server.toml`, then `./appeal-server.toml`,
    /// then `APPEAL_*` environment variables.
    pub fn load() -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(File::with_name("/etc/appeal/server").required(false))
            .add_source(File::with_name("appeal-server").required(false))
            .add_source(Environment::with_prefix("APPEAL"));

        Self::from_builder(builder)
    }

    pub fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("listen_port", 3001)?
            .set_default("storage_dir", "server-backend")?
            .set_default("base_path", "/api")?)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config: Self = builder
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Invalid configuration (is APPEAL_API_KEY set?)")?;

        config.validated()
    }

    fn validated(mut self) -> Result<Self> {
        self.api_key = self.api_key.trim().to_string();
        if self.api_key.is_empty() {
            anyhow::bail!("api_key must not be empty");
        }

        let base = self.base_path.trim().trim_end_matches('/');
        self.base_path = if base.is_empty() || base.starts_with('/') {
            base.to_string()
        } else {
            format!("/{}", base)
        };

        Ok(self)
    }

    /// Empty when routes are mounted at the root.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}
