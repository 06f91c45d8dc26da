//! Kibana detection-engine import client

use crate::{RuleImporter, SiemError, SiemResult};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use sigmapipe_core::KibanaConfig;
use std::path::Path;

/// Client for Kibana's detection-engine rule import endpoint.
pub struct KibanaClient {
    config: KibanaConfig,
    client: Client,
}

impl KibanaClient {
    pub fn new(config: KibanaConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn import_url(&self) -> String {
        format!(
            "{}/api/detection_engine/rules/_import",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn basic_auth_header(&self) -> String {
        use base64::{engine::general_purpose, Engine as _};
        let credentials = format!("{}:{}", self.config.username, self.config.password);
        format!("Basic {}", general_purpose::STANDARD.encode(credentials))
    }
}

#[async_trait]
impl RuleImporter for KibanaClient {
    async fn import_rule(&self, rule_path: &Path) -> SiemResult<()> {
        let bytes = tokio::fs::read(rule_path).await?;
        let filename = rule_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "rule.ndjson".to_string());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename));

        let response = self
            .client
            .post(self.import_url())
            // Kibana rejects API writes without the anti-forgery header
            .header("kbn-xsrf", "true")
            .header("Authorization", self.basic_auth_header())
            .multipart(form)
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SiemError::Api { status, message });
        }

        Ok(())
    }
}
