//! Configuration loading and representation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::store::{EntityStore, InMemoryEntityStore, JsonFileEntityStore, StoreError};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_ACTOR: &str = "System";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Process configuration, read from `STOCKROOM_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `STOCKROOM_BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `STOCKROOM_DATA_DIR`; `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    /// `STOCKROOM_DEFAULT_ACTOR`; author for acknowledgments that name nobody.
    pub default_actor: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_dir: None,
            default_actor: DEFAULT_ACTOR.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("STOCKROOM_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "STOCKROOM_BIND_ADDR",
                message: e.to_string(),
            })?;

        Ok(Self {
            bind_addr,
            data_dir: get("STOCKROOM_DATA_DIR").map(PathBuf::from),
            default_actor: get("STOCKROOM_DEFAULT_ACTOR").unwrap_or_else(|| DEFAULT_ACTOR.to_string()),
        })
    }

    /// Open the configured entity store.
    pub fn open_store(&self) -> Result<Arc<dyn EntityStore>, StoreError> {
        match &self.data_dir {
            Some(dir) => {
                tracing::info!(data_dir = %dir.display(), "using JSON file entity store");
                Ok(Arc::new(JsonFileEntityStore::open(dir)?))
            }
            None => {
                tracing::warn!("STOCKROOM_DATA_DIR not set; data is kept in memory only");
                Ok(Arc::new(InMemoryEntityStore::new()))
            }
        }
    }
}
