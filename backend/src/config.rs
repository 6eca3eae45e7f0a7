//! Server configuration, read from the environment.
//!
//! | Variable       | Default                    |
//! |----------------|----------------------------|
//! | `HOST`         | `0.0.0.0`                  |
//! | `PORT`         | `3000`                     |
//! | `STORAGE_MODE` | `redis` (or `memory`)      |
//! | `REDIS_URL`    | `redis://127.0.0.1:6379`   |
//! | `STATIC_DIR`   | `frontend/dist`            |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got `{0}`")]
    InvalidPort(String),

    #[error("STORAGE_MODE must be `redis` or `memory`, got `{0}`")]
    UnknownStorageMode(String),

    #[error("invalid listen address `{0}`")]
    InvalidAddress(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Memory,
    Redis,
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "in_memory" => Ok(StorageMode::Memory),
            "redis" => Ok(StorageMode::Redis),
            _ => Err(ConfigError::UnknownStorageMode(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageMode,
    pub redis_url: String,
    pub static_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Blank values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match read("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let storage = match read("STORAGE_MODE") {
            Some(raw) => raw.parse()?,
            None => StorageMode::Redis,
        };

        Ok(Self {
            host: read("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            storage,
            redis_url: read("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            static_dir: read("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(address))
    }
}
