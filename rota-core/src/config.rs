//! Configuration management for Rota
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (ROTA_*)
//! 3. Config file (~/.config/rota/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use rota_db::DatabaseConfig;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// How long in-flight requests may run after a shutdown signal
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,

    pub max_connections: u32,

    /// How long a unit of work waits for the write lock
    #[serde(with = "humantime_serde")]
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            path: db.path,
            max_connections: db.max_connections,
            busy_timeout: db.busy_timeout,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,

    pub database: StoreConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/rota/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rota").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - ROTA_HOST: Address to bind to
    /// - ROTA_PORT: Port to listen on
    /// - ROTA_DB_PATH: Path to the database file
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(host) = var("ROTA_HOST") {
            self.server.host = host;
        }

        if let Some(port) = var("ROTA_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid ROTA_PORT '{}'", port)))?;
        }

        if let Some(path) = var("ROTA_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        db_path: Option<PathBuf>,
    ) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }

        if let Some(port) = port {
            self.server.port = port;
        }

        if let Some(path) = db_path {
            self.database.path = path;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(
        config_path: Option<&Path>,
        host: Option<String>,
        port: Option<u16>,
        db_path: Option<PathBuf>,
    ) -> Result<Self> {
        let base = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load()?,
        };

        Ok(base
            .with_env_overrides()?
            .with_cli_overrides(host, port, db_path))
    }

    /// Store settings in the form the database layer takes
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.database.path)
            .with_max_connections(self.database.max_connections)
            .with_busy_timeout(self.database.busy_timeout)
    }
}
