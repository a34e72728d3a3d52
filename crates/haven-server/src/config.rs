//! Server configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`haven.toml`, or the path in `HAVEN_CONFIG`), then environment variables
//! prefixed `HAVEN_` with `__` between sections, e.g.
//! `HAVEN_CACHE__LIST_TTL_SECS=60`.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use crate::service::CacheTtls;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "HAVEN_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "haven.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),

    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub server: HttpSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// When false, a backend that always misses is used.
    pub enabled: bool,
    pub max_capacity: u64,
    pub list_ttl_secs: u64,
    pub record_ttl_secs: u64,
    pub owner_ttl_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    /// JSON array of listings inserted at start-up.
    pub seed_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Loads configuration from `HAVEN_CONFIG` (or `haven.toml`) and the
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let explicit = path.is_some();
        let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self::load_from(&path, explicit, true)
    }

    /// Loads configuration from a file (required or not) and optionally the
    /// environment.
    pub fn load_from(path: &Path, required: bool, with_env: bool) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080_i64)?
            .set_default("cache.enabled", true)?
            .set_default("cache.max_capacity", 10_000_i64)?
            .set_default("cache.list_ttl_secs", 300_i64)?
            .set_default("cache.record_ttl_secs", 600_i64)?
            .set_default("cache.owner_ttl_secs", 120_i64)?
            .add_source(File::from(path).required(required));

        if with_env {
            builder = builder.add_source(
                Environment::with_prefix("HAVEN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the server cannot run with.
    ///
    /// TTLs that are not ordered `record > list > owner` are accepted but
    /// logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ttls = [
            ("cache.list_ttl_secs", self.cache.list_ttl_secs),
            ("cache.record_ttl_secs", self.cache.record_ttl_secs),
            ("cache.owner_ttl_secs", self.cache.owner_ttl_secs),
        ];
        for (key, secs) in ttls {
            if secs == 0 {
                return Err(ConfigError::invalid(key, "must be greater than zero"));
            }
        }

        if self.cache.max_capacity == 0 {
            return Err(ConfigError::invalid(
                "cache.max_capacity",
                "must be greater than zero",
            ));
        }

        self.server
            .host
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::invalid("server.host", e.to_string()))?;

        if !self.ttls().is_ordered() {
            tracing::warn!(
                list = self.cache.list_ttl_secs,
                record = self.cache.record_ttl_secs,
                owner = self.cache.owner_ttl_secs,
                "Cache TTLs are not ordered record > list > owner"
            );
        }

        Ok(())
    }

    /// Address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::invalid("server.host", e.to_string()))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    pub fn ttls(&self) -> CacheTtls {
        CacheTtls {
            list: Duration::from_secs(self.cache.list_ttl_secs),
            record: Duration::from_secs(self.cache.record_ttl_secs),
            owner: Duration::from_secs(self.cache.owner_ttl_secs),
        }
    }
}
