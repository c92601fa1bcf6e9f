//! Feature vectors, prediction outcomes, and the advice precondition

use crate::gateway::{PredictionData, TransportError};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Allowed drift of `positive + negative` from 1.0
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Form input rejected before any network call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No health metrics were provided")]
    Empty,
    #[error("Field name must not be blank")]
    BlankName,
    #[error("Field `{field}` is duplicated")]
    DuplicateField { field: String },
    #[error("Field `{field}` has no value")]
    MissingValue { field: String },
    #[error("Field `{field}` is not a number: {value:?}")]
    NotNumeric { field: String, value: String },
    #[error("Field `{field}` must be a finite number")]
    NotFinite { field: String },
    #[error("Required field `{field}` is missing")]
    MissingField { field: String },
    #[error("Field `{field}` is not used by the model")]
    UnknownField { field: String },
}

/// Named health metrics submitted for a prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(BTreeMap<String, f64>);

impl FeatureVector {
    /// Build from already-numeric values, rejecting non-finite ones
    pub fn new(values: BTreeMap<String, f64>) -> Result<Self, ValidationError> {
        if values.is_empty() {
            return Err(ValidationError::Empty);
        }
        if let Some((field, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ValidationError::NotFinite {
                field: field.clone(),
            });
        }
        Ok(Self(values))
    }

    /// Parse raw form pairs. Every value must parse as a finite number; nothing
    /// is coerced. With a schema, the field set must match it exactly.
    pub fn parse<I, K, V>(fields: I, schema: Option<&FeatureSchema>) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut values = BTreeMap::new();
        for (name, raw) in fields {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(ValidationError::BlankName);
            }
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                return Err(ValidationError::MissingValue {
                    field: name.to_string(),
                });
            }
            let value: f64 = raw.parse().map_err(|_| ValidationError::NotNumeric {
                field: name.to_string(),
                value: raw.to_string(),
            })?;
            if !value.is_finite() {
                return Err(ValidationError::NotFinite {
                    field: name.to_string(),
                });
            }
            if values.insert(name.to_string(), value).is_some() {
                return Err(ValidationError::DuplicateField {
                    field: name.to_string(),
                });
            }
        }

        let vector = Self::new(values)?;
        if let Some(schema) = schema {
            schema.check(&vector)?;
        }
        Ok(vector)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Feature names the backend model expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    required: Vec<String>,
}

impl FeatureSchema {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            required: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.required
    }

    pub fn check(&self, vector: &FeatureVector) -> Result<(), ValidationError> {
        if let Some(missing) = self.required.iter().find(|n| vector.get(n).is_none()) {
            return Err(ValidationError::MissingField {
                field: missing.clone(),
            });
        }
        if let Some((unknown, _)) = vector
            .iter()
            .find(|(name, _)| !self.required.iter().any(|r| r == name))
        {
            return Err(ValidationError::UnknownField {
                field: unknown.to_string(),
            });
        }
        Ok(())
    }
}

/// Server-derived risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Map the backend's label; the client never derives the bucket itself
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "低风险" => Some(RiskLevel::Low),
            "中风险" => Some(RiskLevel::Medium),
            "高风险" | "极高风险" => Some(RiskLevel::High),
            other => match other.to_ascii_lowercase().as_str() {
                "low" => Some(RiskLevel::Low),
                "medium" => Some(RiskLevel::Medium),
                "high" | "very high" | "very_high" => Some(RiskLevel::High),
                _ => None,
            },
        }
    }
}

/// Validated prediction result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    pub predicted_class: u8,
    pub probability_positive: f64,
    pub probability_negative: f64,
    pub risk_level: RiskLevel,
    /// Label exactly as the backend sent it, for display
    pub risk_label: String,
    pub confidence: Option<f64>,
}

impl TryFrom<PredictionData> for PredictionOutcome {
    type Error = TransportError;

    fn try_from(data: PredictionData) -> Result<Self, Self::Error> {
        let predicted_class = match data.prediction {
            0 => 0,
            1 => 1,
            other => {
                return Err(TransportError::malformed(format!(
                    "prediction must be 0 or 1, got {other}"
                )))
            }
        };

        let positive = data.probability.positive;
        let negative = data.probability.negative;
        let in_unit = |p: f64| (0.0..=1.0).contains(&p);
        if !in_unit(positive) || !in_unit(negative) {
            return Err(TransportError::malformed(format!(
                "probabilities out of range: positive={positive}, negative={negative}"
            )));
        }
        if (positive + negative - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(TransportError::malformed(format!(
                "probabilities do not sum to 1: positive={positive}, negative={negative}"
            )));
        }

        let risk_level = RiskLevel::from_label(&data.risk_level).ok_or_else(|| {
            TransportError::malformed(format!("unrecognised risk level {:?}", data.risk_level))
        })?;

        Ok(Self {
            predicted_class,
            probability_positive: positive,
            probability_negative: negative,
            risk_level,
            risk_label: data.risk_level,
            confidence: data.confidence,
        })
    }
}

/// Last submitted features paired with their outcome
#[derive(Debug, Default)]
pub struct PredictionSession {
    features: Option<FeatureVector>,
    outcome: Option<PredictionOutcome>,
    in_flight: bool,
}

impl PredictionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A predict request started; the stored pair no longer describes the
    /// features the user is working with until it settles.
    pub fn begin_submission(&mut self) {
        self.in_flight = true;
    }

    /// The in-flight predict request failed; the previous pair stands.
    pub fn abandon_submission(&mut self) {
        self.in_flight = false;
    }

    pub fn record_prediction(&mut self, features: FeatureVector, outcome: PredictionOutcome) {
        self.features = Some(features);
        self.outcome = Some(outcome);
        self.in_flight = false;
    }

    pub fn can_request_advice(&self) -> bool {
        !self.in_flight && self.features.is_some() && self.outcome.is_some()
    }

    /// Features to send with an advice request, when allowed
    pub fn advice_request(&self) -> Option<&FeatureVector> {
        if self.can_request_advice() {
            self.features.as_ref()
        } else {
            None
        }
    }

    pub fn features(&self) -> Option<&FeatureVector> {
        self.features.as_ref()
    }

    pub fn outcome(&self) -> Option<&PredictionOutcome> {
        self.outcome.as_ref()
    }
}
