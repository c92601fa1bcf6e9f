//! Backend gateway abstraction
//!
//! Typed access to the prediction/advice/chat/voice HTTP API. Every call
//! resolves to a tagged result; transport and service failures never escape
//! as panics.

mod error;
mod http;
mod types;

pub use error::{TransportError, TransportErrorKind};
pub use http::{resolve_against, HttpGateway};
pub use types::*;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Common interface for reaching the backend
#[async_trait]
pub trait Gateway: Send + Sync {
    /// POST a JSON body, returning the response body when `success` is true
    async fn post(&self, endpoint: Endpoint, body: &Value) -> Result<Value, TransportError>;

    /// GET an endpoint, same result contract as `post`
    async fn get(&self, endpoint: Endpoint) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Gateway + ?Sized> Gateway for Arc<T> {
    async fn post(&self, endpoint: Endpoint, body: &Value) -> Result<Value, TransportError> {
        (**self).post(endpoint, body).await
    }

    async fn get(&self, endpoint: Endpoint) -> Result<Value, TransportError> {
        (**self).get(endpoint).await
    }
}

/// Logging wrapper for gateways
pub struct LoggingGateway<G> {
    inner: G,
}

impl<G: Gateway> LoggingGateway<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    fn log(endpoint: Endpoint, start: std::time::Instant, result: &Result<Value, TransportError>) {
        let duration = start.elapsed();
        match result {
            Ok(_) => {
                tracing::info!(
                    endpoint = endpoint.path(),
                    duration_ms = %duration.as_millis(),
                    "Backend request completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = endpoint.path(),
                    duration_ms = %duration.as_millis(),
                    network = e.is_network(),
                    error = %e.message,
                    "Backend request failed"
                );
            }
        }
    }
}

#[async_trait]
impl<G: Gateway> Gateway for LoggingGateway<G> {
    async fn post(&self, endpoint: Endpoint, body: &Value) -> Result<Value, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.post(endpoint, body).await;
        Self::log(endpoint, start, &result);
        result
    }

    async fn get(&self, endpoint: Endpoint) -> Result<Value, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.get(endpoint).await;
        Self::log(endpoint, start, &result);
        result
    }
}
