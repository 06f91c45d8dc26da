//! SIEM rule import for sigmapipe
//!
//! Uploads converted es-rule documents into Kibana's detection
//! engine. `RuleImporter` is the seam the poller depends on;
//! `KibanaClient` is the one production implementation.

pub mod kibana;

pub use kibana::KibanaClient;

use async_trait::async_trait;
use std::path::Path;

/// SIEM operation result type
pub type SiemResult<T> = Result<T, SiemError>;

/// SIEM import error types
#[derive(thiserror::Error, Debug)]
pub enum SiemError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error reading rule file: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Imports a converted rule file into the SIEM.
#[async_trait]
pub trait RuleImporter: Send + Sync {
    /// Upload one rule file. The response status is checked; a
    /// non-success status is an error the caller decides what to do
    /// with.
    async fn import_rule(&self, rule_path: &Path) -> SiemResult<()>;
}
