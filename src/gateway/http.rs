//! reqwest-backed gateway

use super::types::{check_envelope, Endpoint};
use super::{Gateway, TransportError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

/// Join a server-relative path onto the API base
pub fn resolve_against(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Production gateway talking JSON over HTTP
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        resolve_against(&self.base_url, endpoint.path())
    }

    /// Send once and classify the outcome. No retries.
    async fn execute(request: RequestBuilder) -> Result<Value, TransportError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                TransportError::network(format!("Connection failed: {e}"))
            } else {
                TransportError::network(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::network(format!("Failed to read response: {e}")))?;

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(status = %status, body = %body, "Non-JSON response body");
            TransportError::malformed(format!("status {status}: {e}"))
        })?;

        check_envelope(value)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn post(&self, endpoint: Endpoint, body: &Value) -> Result<Value, TransportError> {
        let request = self
            .client
            .post(self.url(endpoint))
            .header("Content-Type", "application/json")
            .json(body);
        Self::execute(request).await
    }

    async fn get(&self, endpoint: Endpoint) -> Result<Value, TransportError> {
        Self::execute(self.client.get(self.url(endpoint))).await
    }
}
