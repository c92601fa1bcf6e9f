//! Immutable per-surface views handed to the render sink

use crate::session::{FeatureVector, Message, PredictionOutcome};
use crate::state_machine::{LifecycleState, Surface};
use serde::Serialize;

/// Everything the predict panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictView {
    pub lifecycle: LifecycleState,
    pub features: Option<FeatureVector>,
    pub outcome: Option<PredictionOutcome>,
    pub error: Option<String>,
    pub can_request_advice: bool,
}

/// Everything the advice panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceView {
    pub lifecycle: LifecycleState,
    pub advice: Option<String>,
    /// Precondition notice or failure text
    pub notice: Option<String>,
}

/// A chat or voice transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationView {
    pub lifecycle: LifecycleState,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "surface", rename_all = "snake_case")]
pub enum Snapshot {
    Predict(PredictView),
    Advice(AdviceView),
    Chat(ConversationView),
    Voice(ConversationView),
}

impl Snapshot {
    pub fn surface(&self) -> Surface {
        match self {
            Snapshot::Predict(_) => Surface::Predict,
            Snapshot::Advice(_) => Surface::Advice,
            Snapshot::Chat(_) => Surface::Chat,
            Snapshot::Voice(_) => Surface::Voice,
        }
    }

    pub fn lifecycle(&self) -> &LifecycleState {
        match self {
            Snapshot::Predict(v) => &v.lifecycle,
            Snapshot::Advice(v) => &v.lifecycle,
            Snapshot::Chat(v) | Snapshot::Voice(v) => &v.lifecycle,
        }
    }

    pub fn as_predict(&self) -> Option<&PredictView> {
        match self {
            Snapshot::Predict(v) => Some(v),
            _ => None,
        }
    }

    #[allow(dead_code)] // Used by tests
    pub fn as_advice(&self) -> Option<&AdviceView> {
        match self {
            Snapshot::Advice(v) => Some(v),
            _ => None,
        }
    }

    #[allow(dead_code)] // Used by tests
    pub fn as_conversation(&self) -> Option<&ConversationView> {
        match self {
            Snapshot::Chat(v) | Snapshot::Voice(v) => Some(v),
            _ => None,
        }
    }
}
