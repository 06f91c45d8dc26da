//! Pipeline configuration
//!
//! Loaded once at startup from a JSON file and passed to each
//! component. Secrets can be left out of the file and supplied
//! through the environment instead.

use crate::model::TargetMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for one relay process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// MISP connection settings
    pub misp: MispConfig,

    /// Kibana import settings (used for the es-rule target)
    pub kibana: KibanaConfig,

    /// Sigmac converter settings
    pub sigmac: SigmacConfig,

    /// Directory layout
    pub folders: FolderConfig,

    /// Conversion target
    pub target: TargetMode,

    /// Seconds between poll cycles
    pub poll_interval_secs: u64,
}

/// MISP connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MispConfig {
    /// Base URL of the MISP instance
    pub base_url: String,

    /// API key sent in the `Authorization` header
    pub api_key: String,

    /// Relative time window for the restSearch query, e.g. "5m"
    pub lookback: String,

    /// Skip TLS certificate verification
    ///
    /// MISP instances frequently run on self-signed certificates;
    /// off unless explicitly enabled.
    pub insecure_tls: bool,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Kibana detection-engine import settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KibanaConfig {
    /// Base URL of the Kibana instance
    pub base_url: String,

    /// Basic-auth username
    pub username: String,

    /// Basic-auth password
    pub password: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Sigmac converter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SigmacConfig {
    /// Path to the sigmac binary
    pub binary: PathBuf,

    /// Sigma field-mapping configuration passed with `-c`
    pub config_file: PathBuf,

    /// Backend configuration passed with `--backend-config`
    /// (elastalert target only)
    pub backend_config_file: PathBuf,
}

/// Directories the relay reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderConfig {
    /// Converted rules land here
    pub alerts: PathBuf,

    /// Raw Sigma signatures land here
    pub signatures: PathBuf,

    /// Sigma converter configurations live here
    pub configs: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            misp: MispConfig::default(),
            kibana: KibanaConfig::default(),
            sigmac: SigmacConfig::default(),
            folders: FolderConfig::default(),
            target: TargetMode::EsRule,
            poll_interval_secs: 300,
        }
    }
}

impl Default for MispConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost".to_string(),
            api_key: String::new(),
            lookback: "5m".to_string(),
            insecure_tls: false,
            timeout_secs: 30,
        }
    }
}

impl Default for KibanaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5601".to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: 30,
        }
    }
}

impl Default for SigmacConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("sigmac"),
            config_file: PathBuf::from("./sigma_configs/winlogbeat.yml"),
            backend_config_file: PathBuf::from("./sigma_configs/elastalert_backend.yml"),
        }
    }
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            alerts: PathBuf::from("./alerts"),
            signatures: PathBuf::from("./sigma_signatures"),
            configs: PathBuf::from("./sigma_configs"),
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineConfig {
    /// Load configuration from a JSON file, then apply environment
    /// overrides for secrets (`MISP_API_KEY`, `KIBANA_USERNAME`,
    /// `KIBANA_PASSWORD`).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: PipelineConfig = serde_json::from_str(&raw)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("MISP_API_KEY") {
            self.misp.api_key = key;
        }
        if let Ok(user) = std::env::var("KIBANA_USERNAME") {
            self.kibana.username = user;
        }
        if let Ok(pass) = std::env::var("KIBANA_PASSWORD") {
            self.kibana.password = pass;
        }
    }
}
