//! Wire types for the backend API

use super::TransportError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Backend endpoints consumed by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Predict,
    HealthAdvice,
    Chat,
    Voice,
    ModelInfo,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Predict => "/api/predict",
            Endpoint::HealthAdvice => "/api/health/advice",
            Endpoint::Chat => "/api/chat",
            Endpoint::Voice => "/api/voice",
            Endpoint::ModelInfo => "/api/model/info",
        }
    }
}

/// Accept a response body only when the service flagged `success: true`.
///
/// The backend reports failures either as `{success:false, error}` or as a
/// bare `{error}` with an error status; both become a server failure.
pub fn check_envelope(body: Value) -> Result<Value, TransportError> {
    if body.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(body);
    }
    let reported = body.get("error").and_then(Value::as_str);
    Err(TransportError::from_reported(reported))
}

/// Decode an accepted body into a typed response
pub fn decode<T: DeserializeOwned>(body: Value) -> Result<T, TransportError> {
    serde_json::from_value(body).map_err(TransportError::malformed)
}

/// `/api/predict` success body
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub data: PredictionData,
}

/// Raw prediction payload, validated into an outcome by the session layer
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionData {
    pub prediction: i64,
    pub risk_level: String,
    pub probability: ProbabilityData,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Class probabilities; older backends spell them `class_1`/`class_0`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProbabilityData {
    #[serde(alias = "class_1")]
    pub positive: f64,
    #[serde(alias = "class_0")]
    pub negative: f64,
}

/// `/api/health/advice` success body
#[derive(Debug, Clone, Deserialize)]
pub struct AdviceResponse {
    pub advice: String,
}

/// `/api/chat` and `/api/voice` success body
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
    #[serde(default)]
    pub audio_url: Option<String>,
}

/// `/api/model/info` success body
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfoResponse {
    pub data: ModelInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub model_type: Option<String>,
    pub feature_names: Vec<String>,
}
