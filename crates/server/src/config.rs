//! Server configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port for the form, prediction API, health and metrics
    #[serde(default = "default_port")]
    pub port: u16,

    /// Model artifact path, falls back to `MODEL_PATH`
    #[serde(default = "risk_lib::config::default_model_path")]
    pub model_path: PathBuf,

    /// Load the artifact at startup instead of on the first request
    #[serde(default = "default_preload")]
    pub preload: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_preload() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model_path: risk_lib::config::default_model_path(),
            preload: default_preload(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `RISK_*` environment variables
    pub fn load() -> Result<Self> {
        Self::from_environment(config::Environment::with_prefix("RISK"))
    }

    /// Load configuration from an environment source. Unset keys take their
    /// defaults; a value that does not parse is an error.
    pub fn from_environment(environment: config::Environment) -> Result<Self> {
        let config = config::Config::builder().add_source(environment).build()?;

        config
            .try_deserialize()
            .context("Invalid RISK_* configuration")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment(vars: &[(&str, &str)]) -> config::Environment {
        let mut map = config::Map::new();
        for (key, value) in vars {
            map.insert(key.to_string(), value.to_string());
        }
        config::Environment::with_prefix("RISK").source(Some(map))
    }

    #[test]
    fn test_environment_values() {
        let config = ServerConfig::from_environment(environment(&[
            ("RISK_PORT", "9000"),
            ("RISK_MODEL_PATH", "/srv/model.onnx"),
            ("RISK_PRELOAD", "false"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.model_path, PathBuf::from("/srv/model.onnx"));
        assert!(!config.preload);
    }

    #[test]
    fn test_invalid_value_fails_instead_of_dropping_others() {
        let err = ServerConfig::from_environment(environment(&[
            ("RISK_PORT", "not-a-port"),
            ("RISK_MODEL_PATH", "/srv/model.onnx"),
        ]))
        .unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid RISK_* configuration"));
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert!(config.preload);
    }
}
