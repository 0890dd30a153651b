//! # Configuration
//!
//! Client configuration loading and tracing setup.
//!
//! # Configuration Sources
//!
//! Configuration is loaded in the following order (later sources override earlier):
//! 1. Default values
//! 2. Configuration file, if present (`WEB3_CLIENT_CONFIG_FILE`, default `web3-client.toml`)
//! 3. Environment variables (prefixed with `WEB3_`, `__` between nested keys)
//!
//! A `.env` file in the working directory is read first, so its entries act
//! as environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `WEB3_RPC_URL` | JSON-RPC endpoint | `http://localhost:8545` |
//! | `WEB3_GAS_ORACLE__URL` | Gas price oracle endpoint | ETH Gas Station |
//! | `WEB3_GAS_ORACLE__TIMEOUT_MS` | Oracle request timeout | `5000` |
//! | `WEB3_LOG__LEVEL` | Log level | `info` |
//! | `WEB3_LOG__FORMAT` | Log format (json/pretty) | `json` |
//! | `NETWORK` | Network selector (mainnet/kovan), required | |
//!
//! # Examples
//!
//! ```ignore
//! use web3_client::config::{ClientConfig, init_tracing};
//!
//! let config = ClientConfig::load()?;
//! init_tracing(&config.log);
//! ```

use crate::infrastructure::blockchain::gas::{DEFAULT_GAS_ORACLE_TIMEOUT_MS, DEFAULT_GAS_ORACLE_URL};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the configuration file.
pub const CONFIG_FILE_ENV_VAR: &str = "WEB3_CLIENT_CONFIG_FILE";

const DEFAULT_CONFIG_FILE: &str = "web3-client.toml";
const ENV_PREFIX: &str = "WEB3";

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sources could not be read or deserialized.
    #[error("failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    /// Invalid configuration value.
    #[error("invalid config value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (structured logging).
    #[default]
    Json,
    /// Pretty format (human-readable).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level or `EnvFilter` directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Json,
        }
    }
}

// ============================================================================
// Gas Oracle Configuration
// ============================================================================

/// Gas price oracle configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasOracleConfig {
    /// Oracle endpoint.
    #[serde(default = "default_gas_oracle_url")]
    pub url: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_gas_oracle_timeout")]
    pub timeout_ms: u64,
}

impl Default for GasOracleConfig {
    fn default() -> Self {
        Self {
            url: default_gas_oracle_url(),
            timeout_ms: default_gas_oracle_timeout(),
        }
    }
}

// ============================================================================
// Client Configuration
// ============================================================================

/// Main client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// JSON-RPC endpoint of the node.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Gas price oracle configuration.
    #[serde(default)]
    pub gas_oracle: GasOracleConfig,

    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            gas_oracle: GasOracleConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from `.env`, the optional config file and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is not an error.
        let _ = dotenvy::dotenv();

        let path = std::env::var(CONFIG_FILE_ENV_VAR)
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let config: Self = Config::builder()
            .add_source(File::from(Path::new(&path)).required(false))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file, without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "rpc_url".to_string(),
                message: format!("expected an http(s) url, got '{}'", self.rpc_url),
            });
        }

        if self.gas_oracle.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gas_oracle.timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if EnvFilter::try_new(&self.log.level).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "log.level".to_string(),
                message: format!("invalid log level '{}'", self.log.level),
            });
        }

        Ok(())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Calling this more
/// than once keeps the first subscriber.
pub fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let _ = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}

// ============================================================================
// Default Value Functions
// ============================================================================

fn default_rpc_url() -> String {
    "http://localhost:8545".to_string()
}

fn default_gas_oracle_url() -> String {
    DEFAULT_GAS_ORACLE_URL.to_string()
}

fn default_gas_oracle_timeout() -> u64 {
    DEFAULT_GAS_ORACLE_TIMEOUT_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.gas_oracle.url, DEFAULT_GAS_ORACLE_URL);
        assert_eq!(config.gas_oracle.timeout_ms, 5_000);
        assert_eq!(config.log.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn toml_overrides_nested_values() {
        let config = ClientConfig::from_toml_str(
            r#"
            rpc_url = "https://kovan.example.org"

            [gas_oracle]
            timeout_ms = 750

            [log]
            format = "pretty"
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.rpc_url, "https://kovan.example.org");
        assert_eq!(config.gas_oracle.timeout_ms, 750);
        assert_eq!(config.gas_oracle.url, DEFAULT_GAS_ORACLE_URL);
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn rejects_non_http_rpc_url() {
        let err = ClientConfig::from_toml_str(r#"rpc_url = "ws://localhost:8546""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "rpc_url"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = ClientConfig::from_toml_str("[gas_oracle]\ntimeout_ms = 0").unwrap_err();
        assert!(err.to_string().contains("gas_oracle.timeout_ms"));
    }

    #[test]
    fn rejects_unparseable_toml() {
        assert!(matches!(
            ClientConfig::from_toml_str("rpc_url = "),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ClientConfig::from_file("does-not-exist.toml").is_err());
    }

    #[test]
    fn log_format_default() {
        assert_eq!(LogFormat::default(), LogFormat::Json);
    }

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing(&LogConfig::default());
        init_tracing(&LogConfig {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
        });
    }
}
