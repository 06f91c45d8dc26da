//! MISP restSearch client

use crate::{IntelClient, IntelError, IntelResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sigmapipe_core::{Attribute, MispConfig};

/// MISP client querying the attributes restSearch endpoint.
pub struct MispClient {
    config: MispConfig,
    client: Client,
}

impl MispClient {
    /// Create a new MISP client from connection settings.
    pub fn new(config: MispConfig) -> IntelResult<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.insecure_tls)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    fn search_url(&self) -> String {
        format!("{}/attributes/restSearch", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl IntelClient for MispClient {
    async fn fetch_recent_signatures(&self) -> IntelResult<Vec<Attribute>> {
        let body = RestSearchRequest {
            return_format: "json",
            attribute_type: "sigma",
            last: &self.config.lookback,
        };

        let response = self
            .client
            .post(self.search_url())
            .header("Authorization", &self.config.api_key)
            .header("Accept", "application/json")
            .header("Content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(IntelError::Api { status, message });
        }

        let envelope: RestSearchResponse = response.json().await?;
        Ok(envelope.response.attribute)
    }
}

/// restSearch request body
#[derive(Serialize)]
struct RestSearchRequest<'a> {
    #[serde(rename = "returnFormat")]
    return_format: &'a str,

    #[serde(rename = "type")]
    attribute_type: &'a str,

    last: &'a str,
}

/// restSearch response envelope: `{"response": {"Attribute": [...]}}`
#[derive(Deserialize)]
struct RestSearchResponse {
    #[serde(default)]
    response: AttributeList,
}

#[derive(Deserialize, Default)]
struct AttributeList {
    #[serde(rename = "Attribute", default)]
    attribute: Vec<Attribute>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: &str) -> MispConfig {
        MispConfig {
            base_url: base_url.to_string(),
            api_key: "test-api-key".to_string(),
            lookback: "5m".to_string(),
            insecure_tls: false,
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_fetch_recent_signatures() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/attributes/restSearch")
            .match_header("Authorization", "test-api-key")
            .match_header("Content-type", "application/json")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "returnFormat": "json",
                "type": "sigma",
                "last": "5m"
            })))
            .with_status(200)
            .with_body(
                r#"{"response": {"Attribute": [
                    {"id": "7", "value": "title: test", "type": "sigma", "event_id": "12"},
                    {"id": "8", "value": "title: other", "type": "sigma"}
                ]}}"#,
            )
            .create_async()
            .await;

        let client = MispClient::new(test_config(&server.url())).unwrap();
        let attributes = client.fetch_recent_signatures().await.unwrap();

        mock.assert_async().await;
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[0].id, "7");
        assert_eq!(attributes[0].value, "title: test");
        assert_eq!(attributes[1].id, "8");
    }

    #[tokio::test]
    async fn test_empty_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/attributes/restSearch")
            .with_status(200)
            .with_body(r#"{"response": {"Attribute": []}}"#)
            .create_async()
            .await;

        let client = MispClient::new(test_config(&server.url())).unwrap();
        let attributes = client.fetch_recent_signatures().await.unwrap();
        assert!(attributes.is_empty());
    }

    #[tokio::test]
    async fn test_missing_attribute_array_is_empty_poll() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/attributes/restSearch")
            .with_status(200)
            .with_body(r#"{"response": {}}"#)
            .create_async()
            .await;

        let client = MispClient::new(test_config(&server.url())).unwrap();
        let attributes = client.fetch_recent_signatures().await.unwrap();
        assert!(attributes.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/attributes/restSearch")
            .with_status(403)
            .with_body("authentication failed")
            .create_async()
            .await;

        let client = MispClient::new(test_config(&server.url())).unwrap();
        let error = client.fetch_recent_signatures().await.unwrap_err();
        match error {
            IntelError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "authentication failed");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/attributes/restSearch")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let client = MispClient::new(test_config(&server.url())).unwrap();
        assert!(client.fetch_recent_signatures().await.is_err());
    }

    #[test]
    fn test_search_url_normalizes_trailing_slash() {
        let client = MispClient::new(test_config("https://misp.example.org/")).unwrap();
        assert_eq!(
            client.search_url(),
            "https://misp.example.org/attributes/restSearch"
        );
    }
}
