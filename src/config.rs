//! Client configuration from the environment

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Configuration for the backend connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL the `/api/...` paths are joined onto
    pub api_base: String,
    /// Optional client-side timeout; a timeout settles as a network failure
    pub request_timeout: Option<Duration>,
    /// Fetch the model's feature names at startup
    pub load_schema: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: None,
            load_schema: false,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base = lookup("CARDIO_API_BASE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let request_timeout = lookup("CARDIO_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let load_schema = lookup("CARDIO_LOAD_SCHEMA")
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"));

        Self {
            api_base,
            request_timeout,
            load_schema,
        }
    }
}
