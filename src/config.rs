//! Server configuration
//!
//! Defaults, overridden by an optional TOML file, then by environment
//! variables. Command-line flags are applied last by the binary.

use crate::errors::{ConfigResult, ConfigurationError};
use serde::{Deserialize, Serialize};
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// API server configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// PostgreSQL connection string; data endpoints answer 500 without it
    pub database_url: Option<String>,
    pub database_pool_size: u32,
    pub run_migrations: bool,
    /// Directory holding the built web client, served for non-API paths
    pub static_dir: Option<PathBuf>,
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            database_pool_size: 10,
            run_migrations: true,
            static_dir: Some(PathBuf::from("dist")),
            allowed_origins: vec!["*".to_string()],
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Load from a TOML file; keys missing from the file keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> ConfigResult<()> {
        self.apply_env_from(|key| env::var(key).ok())
    }

    /// Apply overrides read through `lookup`
    ///
    /// Recognised keys: `DATABASE_URL`, `PORT`, `HIGHROLLER_HOST`,
    /// `HIGHROLLER_STATIC_DIR`, `HIGHROLLER_POOL_SIZE`.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            self.database_url = Some(url);
        }
        if let Some(port) = lookup("PORT") {
            self.port = parse_value("PORT", port, "Invalid port number")?;
        }
        if let Some(host) = lookup("HIGHROLLER_HOST") {
            self.host = host;
        }
        if let Some(dir) = lookup("HIGHROLLER_STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(dir));
        }
        if let Some(size) = lookup("HIGHROLLER_POOL_SIZE") {
            self.database_pool_size = parse_value("HIGHROLLER_POOL_SIZE", size, "Invalid pool size")?;
        }
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "port".to_string(),
                value: "0".to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        if self.host.parse::<IpAddr>().is_err() {
            return Err(ConfigurationError::InvalidValue {
                field: "host".to_string(),
                value: self.host.clone(),
                reason: "Host must be an IP address".to_string(),
            });
        }

        if self.database_pool_size == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "database_pool_size".to_string(),
                value: "0".to_string(),
                reason: "Pool size cannot be zero".to_string(),
            });
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigurationError::ValidationFailed(
                "request_timeout_secs must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        let ip = self.host.parse::<IpAddr>().map_err(|_| ConfigurationError::InvalidValue {
            field: "host".to_string(),
            value: self.host.clone(),
            reason: "Host must be an IP address".to_string(),
        })?;
        Ok(SocketAddr::from((ip, self.port)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_value<T: std::str::FromStr>(field: &str, value: String, reason: &str) -> ConfigResult<T> {
    value.parse().map_err(|_| ConfigurationError::InvalidValue {
        field: field.to_string(),
        value,
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.port, 3000);
        assert!(config.database_url.is_none());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_config_validation() {
        let mut config = ServerConfig::default();
        config.port = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.host = "not-an-ip".to_string();
        assert!(config.validate().is_err());
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = 8081").unwrap();
        writeln!(file, "database_url = \"postgres://localhost/casino\"").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/casino"));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.database_pool_size, 10);
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = \"eighty\"").unwrap();

        let err = ServerConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigurationError::LoadFailed(_)));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgres://db/casino"),
            ("PORT", "4000"),
            ("HIGHROLLER_STATIC_DIR", "/srv/www"),
        ]
        .into_iter()
        .collect();

        let mut config = ServerConfig::default();
        config
            .apply_env_from(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.database_url.as_deref(), Some("postgres://db/casino"));
        assert_eq!(config.static_dir, Some(PathBuf::from("/srv/www")));
        assert_eq!(
            config.socket_addr().unwrap(),
            "0.0.0.0:4000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_env_bad_port_is_reported() {
        let mut config = ServerConfig::default();
        let err = config
            .apply_env_from(|key| (key == "PORT").then(|| "http".to_string()))
            .unwrap_err();

        match err {
            ConfigurationError::InvalidValue { field, value, .. } => {
                assert_eq!(field, "PORT");
                assert_eq!(value, "http");
            }
            other => panic!("Expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_database_url_is_ignored() {
        let mut config = ServerConfig::default();
        config
            .apply_env_from(|key| (key == "DATABASE_URL").then(|| "  ".to_string()))
            .unwrap();
        assert!(config.database_url.is_none());
    }
}
