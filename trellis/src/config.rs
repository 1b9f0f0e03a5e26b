//! Service configuration.
//!
//! Loaded from environment variables:
//!
//! - `TRELLIS_SNAPSHOT_PATH`: snapshot file to serve queries from (required)
//! - `TRELLIS_LISTEN_PORT`: port to listen on (default: `3000`)
//! - `TRELLIS_CARDINALITY_INFERENCE`: `true`/`false`, overrides the
//!   snapshot's own `cardinality-inference` flag when set
//!
//! # Invariants
//!
//! - `listen_port` is always a valid port number
//! - `snapshot_path` is non-empty (the file may not exist yet)

use std::path::PathBuf;

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Snapshot loaded at startup.
    pub snapshot_path: PathBuf,
    /// Port to listen on for HTTP requests.
    pub listen_port: u16,
    /// Forced cardinality inference setting, if any.
    pub cardinality_inference: Option<bool>,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is missing.
    MissingEnvVar(String),
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEnvVar(name) => {
                write!(f, "missing required environment variable: {name}")
            }
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

const SNAPSHOT_PATH: &str = "TRELLIS_SNAPSHOT_PATH";
const LISTEN_PORT: &str = "TRELLIS_LISTEN_PORT";
const CARDINALITY_INFERENCE: &str = "TRELLIS_CARDINALITY_INFERENCE";

impl ServiceConfig {
    /// Default port for the service.
    pub const DEFAULT_PORT: u16 = 3000;

    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `TRELLIS_SNAPSHOT_PATH` is not set or is empty
    /// - `TRELLIS_LISTEN_PORT` is set but not a valid port number
    /// - `TRELLIS_CARDINALITY_INFERENCE` is set but not `true` or `false`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    /// if it is set.
    ///
    /// # Errors
    ///
    /// See [`ServiceConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            snapshot_path: Self::load_snapshot_path(lookup(SNAPSHOT_PATH))?,
            listen_port: Self::load_listen_port(lookup(LISTEN_PORT))?,
            cardinality_inference: Self::load_cardinality_inference(lookup(CARDINALITY_INFERENCE))?,
        })
    }

    fn load_snapshot_path(value: Option<String>) -> Result<PathBuf, ConfigError> {
        let path = value.ok_or_else(|| ConfigError::MissingEnvVar(SNAPSHOT_PATH.to_owned()))?;
        if path.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: SNAPSHOT_PATH.to_owned(),
                message: "must not be empty".to_owned(),
            });
        }
        Ok(PathBuf::from(path))
    }

    fn load_listen_port(value: Option<String>) -> Result<u16, ConfigError> {
        match value {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: LISTEN_PORT.to_owned(),
                message: format!("'{value}' is not a valid port number (must be 1-65535)"),
            }),
            None => Ok(Self::DEFAULT_PORT),
        }
    }

    fn load_cardinality_inference(value: Option<String>) -> Result<Option<bool>, ConfigError> {
        value
            .map(|value| {
                value.parse::<bool>().map_err(|_| ConfigError::InvalidValue {
                    name: CARDINALITY_INFERENCE.to_owned(),
                    message: format!("'{value}' is not 'true' or 'false'"),
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServiceConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = load(&[(SNAPSHOT_PATH, "/data/snapshot.json")]).unwrap();
        assert_eq!(config.snapshot_path, PathBuf::from("/data/snapshot.json"));
        assert_eq!(config.listen_port, ServiceConfig::DEFAULT_PORT);
        assert_eq!(config.cardinality_inference, None);
    }

    #[test]
    fn test_all_values() {
        let config = load(&[
            (SNAPSHOT_PATH, "snap.json"),
            (LISTEN_PORT, "8080"),
            (CARDINALITY_INFERENCE, "false"),
        ])
        .unwrap();
        assert_eq!(config.listen_port, 8080);
        assert_eq!(config.cardinality_inference, Some(false));
    }

    #[test]
    fn test_missing_snapshot_path() {
        assert_eq!(
            load(&[]).unwrap_err(),
            ConfigError::MissingEnvVar(SNAPSHOT_PATH.to_owned())
        );
        assert!(matches!(
            load(&[(SNAPSHOT_PATH, "")]),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[(SNAPSHOT_PATH, "s.json"), (LISTEN_PORT, "99999")]),
            Err(ConfigError::InvalidValue { name, .. }) if name == LISTEN_PORT
        ));
        assert!(matches!(
            load(&[(SNAPSHOT_PATH, "s.json"), (CARDINALITY_INFERENCE, "yes")]),
            Err(ConfigError::InvalidValue { name, .. }) if name == CARDINALITY_INFERENCE
        ));
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::MissingEnvVar("TEST_VAR".to_owned()).to_string(),
            "missing required environment variable: TEST_VAR"
        );
        assert_eq!(
            ConfigError::InvalidValue {
                name: "TEST_VAR".to_owned(),
                message: "bad value".to_owned(),
            }
            .to_string(),
            "invalid value for TEST_VAR: bad value"
        );
    }
}
