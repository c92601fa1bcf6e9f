//! Per-surface session state
//!
//! Prediction pairing for the predict/advice surfaces and message history for
//! the conversational surfaces. Instances are owned by the orchestrator; there
//! is no module-level state.

pub mod conversation;
pub mod prediction;


pub use conversation::{ConversationLog, LogError, Message, MessageId, Role};
pub use prediction::{
    FeatureSchema, FeatureVector, PredictionOutcome, PredictionSession, RiskLevel, ValidationError,
};
