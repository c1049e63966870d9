//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::validation::{PostalCodePolicy, ValidationConfig};

pub const ADDR_VAR: &str = "BUS_SERVICE_ADDR";
pub const DATA_VAR: &str = "BUS_SERVICE_DATA";
pub const STATIC_VAR: &str = "BUS_SERVICE_STATIC";
pub const POSTAL_CODE_VAR: &str = "BUS_SERVICE_POSTAL_CODE";

/// Error returned when an environment variable holds an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    reason: String,
}

/// Everything the binary needs to start serving.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub addr: SocketAddr,

    /// JSON snapshot that seeds the record store.
    pub data_path: PathBuf,

    /// Directory served under `/static`.
    pub static_dir: PathBuf,

    pub validation: ValidationConfig,
}

impl ServerConfig {
    pub fn new(
        addr: SocketAddr,
        data_path: PathBuf,
        static_dir: PathBuf,
        validation: ValidationConfig,
    ) -> Self {
        Self {
            addr,
            data_path,
            static_dir,
            validation,
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(ADDR_VAR) {
            config.addr = value.parse().map_err(|e: std::net::AddrParseError| ConfigError {
                var: ADDR_VAR,
                reason: e.to_string(),
                value,
            })?;
        }
        if let Some(value) = lookup(DATA_VAR) {
            config.data_path = PathBuf::from(value);
        }
        if let Some(value) = lookup(STATIC_VAR) {
            config.static_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup(POSTAL_CODE_VAR) {
            let policy: PostalCodePolicy = value.parse().map_err(|e: crate::validation::UnknownPolicy| {
                ConfigError {
                    var: POSTAL_CODE_VAR,
                    reason: e.to_string(),
                    value,
                }
            })?;
            config.validation = ValidationConfig::new(policy);
        }

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_path: PathBuf::from("data/seed.json"),
            static_dir: PathBuf::from("static"),
            validation: ValidationConfig::default(),
        }
    }
}
