//! Lifecycle state types

use serde::Serialize;
use std::fmt;

/// An independently stateful interaction panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Predict,
    Advice,
    Chat,
    Voice,
}

impl Surface {
    pub const ALL: [Surface; 4] = [
        Surface::Predict,
        Surface::Advice,
        Surface::Chat,
        Surface::Voice,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Surface::Predict => "predict",
            Surface::Advice => "advice",
            Surface::Chat => "chat",
            Surface::Voice => "voice",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Request lifecycle of one surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleState {
    /// Ready for a submission
    #[default]
    Idle,

    /// Request in flight; further submissions are dropped
    Pending,

    /// Response settled successfully, not yet consumed
    Succeeded,

    /// Response settled with an error, not yet consumed
    Failed { message: String },
}

impl LifecycleState {
    pub fn is_pending(&self) -> bool {
        matches!(self, LifecycleState::Pending)
    }

    /// Succeeded/Failed fold back to Idle once consumed
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LifecycleState::Succeeded | LifecycleState::Failed { .. }
        )
    }
}
