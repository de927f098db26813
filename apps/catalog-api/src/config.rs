//! Catalog API configuration module.
//!
//! Configuration is layered, later sources winning:
//!
//! 1. Built-in defaults (this file)
//! 2. Optional config file (`catalog.toml` in the working directory)
//! 3. Environment variables (`CATALOG_*`)

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

use catalog_db::DbConfig;

/// Default config file name (extension resolved by the `config` crate).
pub const DEFAULT_CONFIG_FILE: &str = "catalog";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "CATALOG";

/// Catalog API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file, or `:memory:`
    pub database_path: String,

    /// Pool size
    pub max_connections: u32,

    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl ApiConfig {
    /// Load configuration from `catalog.toml` (if present) and the
    /// process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(
            Some(DEFAULT_CONFIG_FILE),
            Environment::with_prefix(ENV_PREFIX),
        )
    }

    /// Load configuration from an optional file and an environment source.
    pub fn load_from(file: Option<&str>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("database_path", "catalog.db")?
            .set_default("max_connections", 5)?
            .set_default("log_filter", "info,catalog_api=debug,catalog_db=debug")?;

        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }

        let config: ApiConfig = builder
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }

        if self.database_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("database_path".to_string()));
        }

        self.host
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidValue("host".to_string()))?;

        Ok(())
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidValue("host".to_string()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        if self.database_path == ":memory:" {
            return DbConfig::in_memory();
        }

        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::load_from(None, env(&[])).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, "catalog.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.bind_addr().unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_environment_overrides() {
        let config = ApiConfig::load_from(
            None,
            env(&[
                ("CATALOG_PORT", "9090"),
                ("CATALOG_DATABASE_PATH", ":memory:"),
                ("CATALOG_HOST", "127.0.0.1"),
            ]),
        )
        .unwrap();

        assert_eq!(config.port, 9090);
        assert!(config.db_config().is_in_memory());
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:9090");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ApiConfig::load_from(None, env(&[("CATALOG_PORT", "not-a-port")])).is_err());
        assert!(matches!(
            ApiConfig::load_from(None, env(&[("CATALOG_MAX_CONNECTIONS", "0")])),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            ApiConfig::load_from(None, env(&[("CATALOG_HOST", "nowhere")])),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
