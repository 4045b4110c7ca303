//! Server configuration
//!
//! Sources, lowest priority first: built-in defaults, an optional
//! `feedback.toml` (path from `FEEDBACK_CONFIG`), then `FEEDBACK_*`
//! environment variables. The bare `PORT` variable is honoured when no
//! port is configured otherwise.

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "feedback.toml";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/feedback.db?mode=rwc";

/// Which record store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl StoreBackend {
    pub fn default_port(self) -> u16 {
        match self {
            StoreBackend::Sqlite => 5000,
            StoreBackend::Memory => 3000,
        }
    }

    pub fn default_list_limit(self) -> usize {
        match self {
            StoreBackend::Sqlite => 50,
            StoreBackend::Memory => 20,
        }
    }

    pub fn default_seed_demo_data(self) -> bool {
        matches!(self, StoreBackend::Memory)
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Sqlite => write!(f, "sqlite"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Raw shape as read from config sources; backend-dependent keys stay optional
#[derive(Debug, Deserialize)]
struct RawConfig {
    store: StoreBackend,
    host: String,
    port: Option<u16>,
    database_url: String,
    max_connections: u32,
    acquire_timeout_secs: u64,
    list_limit: Option<usize>,
    seed_demo_data: Option<bool>,
    log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub store: StoreBackend,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub list_limit: usize,
    pub seed_demo_data: bool,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from the file and environment
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("FEEDBACK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let config = Self::builder()?
            .add_source(File::with_name(&path).required(false))
            .add_source(Environment::with_prefix("FEEDBACK").try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read configuration (file: {})", path))?;

        Self::from_config(config, legacy_port()?)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("store", "sqlite")?
            .set_default("host", "0.0.0.0")?
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("max_connections", 5)?
            .set_default("acquire_timeout_secs", 5)?
            .set_default("log_format", "pretty")?)
    }

    fn from_config(config: Config, legacy_port: Option<u16>) -> Result<Self> {
        let raw: RawConfig = config
            .try_deserialize()
            .context("Invalid configuration")?;

        let list_limit = raw
            .list_limit
            .unwrap_or_else(|| raw.store.default_list_limit());
        if list_limit == 0 {
            bail!("list_limit must be greater than zero");
        }
        if raw.max_connections == 0 {
            bail!("max_connections must be greater than zero");
        }

        Ok(Self {
            store: raw.store,
            host: raw.host,
            port: raw
                .port
                .or(legacy_port)
                .unwrap_or_else(|| raw.store.default_port()),
            database_url: raw.database_url,
            max_connections: raw.max_connections,
            acquire_timeout: Duration::from_secs(raw.acquire_timeout_secs),
            list_limit,
            seed_demo_data: raw
                .seed_demo_data
                .unwrap_or_else(|| raw.store.default_seed_demo_data()),
            log_format: raw.log_format,
        })
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn legacy_port() -> Result<Option<u16>> {
    match std::env::var("PORT") {
        Ok(value) => value
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid PORT value: {}", value)),
        Err(_) => Ok(None),
    }
}
