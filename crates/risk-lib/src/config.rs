//! Engine configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable holding the artifact path
pub const MODEL_PATH_ENV: &str = "MODEL_PATH";

/// Artifact path used when `MODEL_PATH` is unset
pub const DEFAULT_MODEL_PATH: &str = "model/burnout_model.json";

/// Engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Location of the trained model artifact
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
}

/// `MODEL_PATH` if set and non-empty, else the fixed default
pub fn default_model_path() -> PathBuf {
    std::env::var(MODEL_PATH_ENV)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the environment
    pub fn from_env() -> Self {
        Self {
            model_path: default_model_path(),
        }
    }

    pub fn with_model_path(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path() {
        assert_eq!(
            EngineConfig::default().model_path,
            PathBuf::from("model/burnout_model.json")
        );
    }

    #[test]
    fn test_with_model_path() {
        let config = EngineConfig::with_model_path("/tmp/model.onnx");
        assert_eq!(config.model_path, PathBuf::from("/tmp/model.onnx"));
    }

    #[test]
    fn test_deserialize_fills_default() {
        let config: EngineConfig = serde_json::from_str(r#"{"model_path": "a/b.json"}"#).unwrap();
        assert_eq!(config.model_path, PathBuf::from("a/b.json"));
    }
}
