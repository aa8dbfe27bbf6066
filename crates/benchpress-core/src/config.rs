use crate::model::BenchConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("unsupported config version {found} (supported: {supported})")]
    Version { found: u32, supported: u32 },
    #[error("{0}")]
    Invalid(String),
    #[error("failed to write sample config {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchFile {
    pub version: u32,
    pub configs: Vec<BenchConfig>,
}

pub fn load_config(path: &Path) -> Result<Vec<BenchConfig>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    let file: BenchFile = serde_yaml::from_str(&raw)?;
    if file.version != SUPPORTED_CONFIG_VERSION {
        return Err(ConfigError::Version {
            found: file.version,
            supported: SUPPORTED_CONFIG_VERSION,
        });
    }
    if file.configs.is_empty() {
        return Err(ConfigError::Invalid("config has no configurations".into()));
    }
    let mut seen = HashSet::new();
    for cfg in &file.configs {
        if cfg.name.is_empty() {
            return Err(ConfigError::Invalid("configuration with empty name".into()));
        }
        if !seen.insert(cfg.name.clone()) {
            return Err(ConfigError::Invalid(format!(
                "duplicate configuration name: {}",
                cfg.name
            )));
        }
        if cfg.timeout_secs == 0 {
            return Err(ConfigError::Invalid(format!(
                "configuration {} has a zero timeout",
                cfg.name
            )));
        }
    }
    Ok(file.configs)
}

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, include_str!("../../../bench.yaml")).map_err(|e| ConfigError::Write {
        path: path.display().to_string(),
        source: e,
    })
}
