use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Which storage backend the process runs against. Selected once at startup;
/// an unrecognized value fails deserialization and aborts startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    Sqlite,
    Postgres,
    Filestore,
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => f.write_str("sqlite"),
            Self::Postgres => f.write_str("postgres"),
            Self::Filestore => f.write_str("filestore"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub server: ServerConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(rename = "type")]
    pub store_type: StoreType,
    #[serde(default)]
    pub sqlite: Option<SqliteConfig>,
    #[serde(default)]
    pub postgres: Option<PostgresConfig>,
    #[serde(default)]
    pub filestore: Option<FileStoreConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SqliteConfig {
    pub db_path: PathBuf,
    pub schema_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub schema_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileStoreConfig {
    pub file_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub token: String,
}

impl Config {
    /// Reads and parses the JSON configuration file. Called once at startup;
    /// the result is immutable for the life of the process.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        match self.store.store_type {
            StoreType::Sqlite if self.store.sqlite.is_none() => {
                anyhow::bail!("store type is sqlite but the sqlite section is missing")
            }
            StoreType::Postgres if self.store.postgres.is_none() => {
                anyhow::bail!("store type is postgres but the postgres section is missing")
            }
            StoreType::Filestore if self.store.filestore.is_none() => {
                anyhow::bail!("store type is filestore but the filestore section is missing")
            }
            _ => Ok(()),
        }
    }
}
