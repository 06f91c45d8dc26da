//! Threat-intel client for sigmapipe
//!
//! Queries a MISP instance for recently created attributes of type
//! `sigma` via the restSearch API. The `IntelClient` trait is the
//! seam the poller depends on, so tests can substitute an in-process
//! double for the network.

pub mod misp;

pub use misp::MispClient;

use async_trait::async_trait;
use sigmapipe_core::Attribute;

/// Intel query result type
pub type IntelResult<T> = Result<T, IntelError>;

/// Intel query error types
#[derive(thiserror::Error, Debug)]
pub enum IntelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Source of new Sigma signature attributes.
#[async_trait]
pub trait IntelClient: Send + Sync {
    /// Fetch all sigma attributes created within the configured
    /// lookback window. An empty vec means no new events.
    async fn fetch_recent_signatures(&self) -> IntelResult<Vec<Attribute>>;
}
