use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use crate::{error::ExplorerError, provider::ProviderId, resolver::Endpoint};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where the HTTP API listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Configuration for a single provider (API key, optional base URL override).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// May be left out of the file when the key comes from the environment.
    #[serde(default)]
    pub api_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk and overlaid by the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Upper bound for a single outbound provider call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub server: ServerConfig,

    /// Example TOML:
    /// [providers.yelp]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            server: ServerConfig::default(),
            providers: HashMap::new(),
        }
    }
}

impl Config {
    /// Load the config file, then overlay process environment variables.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.apply_env_with(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "city-explorer", "explorer")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay values found through `lookup` (normally the process environment).
    ///
    /// Empty values are ignored so an exported-but-blank variable does not wipe
    /// a key stored in the config file.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }

        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{port}'"))?;
        }

        if let Some(secs) = get("UPSTREAM_TIMEOUT_SECS") {
            self.timeout_secs = secs.trim().parse().with_context(|| {
                format!("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds, got '{secs}'")
            })?;
        }

        for id in ProviderId::all() {
            if let Some(key) = get(id.env_key()) {
                self.providers
                    .entry(id.as_str().to_string())
                    .and_modify(|cfg| cfg.api_key = key.clone())
                    .or_insert(ProviderConfig {
                        api_key: key,
                        base_url: None,
                    });
            }
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Set or replace a provider API key, keeping any base URL override.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers
            .entry(provider_id.as_str().to_string())
            .and_modify(|cfg| cfg.api_key = api_key.clone())
            .or_insert(ProviderConfig {
                api_key,
                base_url: None,
            });
    }

    pub fn set_provider_base_url(&mut self, provider_id: ProviderId, base_url: String) {
        self.providers
            .entry(provider_id.as_str().to_string())
            .and_modify(|cfg| cfg.base_url = Some(base_url.clone()))
            .or_insert(ProviderConfig {
                api_key: String::new(),
                base_url: Some(base_url),
            });
    }

    /// Returns API key for a provider, if present and non-empty.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.provider_config(provider_id)
            .map(|cfg| cfg.api_key.as_str())
            .filter(|key| !key.is_empty())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }

    pub fn unconfigured_providers(&self) -> Vec<ProviderId> {
        ProviderId::all()
            .iter()
            .copied()
            .filter(|id| !self.is_provider_configured(*id))
            .collect()
    }

    /// Resolve where and how to call `id`.
    pub fn endpoint(&self, id: ProviderId) -> crate::Result<Endpoint> {
        let api_key = self
            .provider_api_key(id)
            .ok_or(ExplorerError::MissingApiKey(id))?
            .to_owned();

        let raw = self
            .provider_config(id)
            .and_then(|cfg| cfg.base_url.as_deref())
            .unwrap_or_else(|| id.default_base_url());

        let base_url = Url::parse(raw).map_err(|e| ExplorerError::InvalidUrl {
            provider: id,
            message: format!("'{raw}': {e}"),
        })?;

        Ok(Endpoint { base_url, api_key })
    }
}
