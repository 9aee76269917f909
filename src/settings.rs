//! Environment-driven settings. Nested keys use `__`, e.g. `DATABASE__DSN`.

use crate::error::ConfigError;
use figment::{providers::Env, Figment};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    pub database: DatabaseSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct DatabaseSettings {
    /// Connection string, e.g. `postgres://localhost/pyrador` or `sqlite::memory:`.
    pub dsn: String,
    /// Flush queued writes before every read.
    #[serde(default = "default_true")]
    pub auto_flush: bool,
    /// Make every flushed write durable immediately instead of waiting for `commit`.
    #[serde(default)]
    pub auto_commit: bool,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind: default_bind(),
        }
    }
}

impl DatabaseSettings {
    pub fn new(dsn: impl Into<String>) -> Self {
        DatabaseSettings {
            dsn: dsn.into(),
            auto_flush: true,
            auto_commit: false,
            max_connections: default_max_connections(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_connections() -> u32 {
    5
}

fn default_bind() -> String {
    "0.0.0.0:3000".into()
}

impl Settings {
    /// Process environment only, `__` as the nesting delimiter.
    pub fn figment() -> Figment {
        Figment::new().merge(
            Env::raw()
                .filter(|k| k.starts_with("database__") || k.starts_with("server__"))
                .split("__"),
        )
    }

    /// Read `.env` (without overriding variables already set), then extract from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(Self::figment().extract()?)
    }
}
