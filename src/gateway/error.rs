//! Gateway error types

use thiserror::Error;

/// Fallback shown when the service reports failure without a message
pub const GENERIC_SERVER_FAILURE: &str = "未知错误";

/// Gateway error with classification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Network, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Server, message)
    }

    /// Service-level failure, using the reported message when there is one
    pub fn from_reported(reported: Option<&str>) -> Self {
        match reported.map(str::trim).filter(|m| !m.is_empty()) {
            Some(message) => Self::server(message),
            None => Self::server(GENERIC_SERVER_FAILURE),
        }
    }

    pub fn malformed(detail: impl std::fmt::Display) -> Self {
        Self::server(format!("Malformed response: {detail}"))
    }

    pub fn is_network(&self) -> bool {
        self.kind == TransportErrorKind::Network
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Request never reached or never came back: refused, DNS, timeout
    Network,
    /// Response arrived but `success` was false or the payload was unusable
    Server,
}
