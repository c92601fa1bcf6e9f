//! Pure state transition function

use super::{Effect, Event, LifecycleState, Settlement};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: LifecycleState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: LifecycleState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[allow(dead_code)] // Used by tests
    pub fn dispatches(&self) -> bool {
        self.effects.contains(&Effect::Dispatch)
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Duplicate submission while a request is in flight; dropped
    #[error("A request is already in flight")]
    Busy,
    #[error("Precondition not met")]
    PreconditionFailed,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function: same inputs, same outputs, no I/O.
pub fn transition(
    state: &LifecycleState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Idle + Submit -> Pending, or rejected synchronously
        (LifecycleState::Idle, Event::Submit { precondition_met: true }) => {
            Ok(TransitionResult::new(LifecycleState::Pending)
                .with_effect(Effect::Render)
                .with_effect(Effect::Dispatch))
        }
        (LifecycleState::Idle, Event::Submit { precondition_met: false }) => {
            Err(TransitionError::PreconditionFailed)
        }

        // Duplicate-submission guard: never queued, never merged
        (LifecycleState::Pending, Event::Submit { .. }) => Err(TransitionError::Busy),

        (LifecycleState::Pending, Event::Settle(Settlement::Ok)) => {
            Ok(TransitionResult::new(LifecycleState::Succeeded).with_effect(Effect::Render))
        }
        (LifecycleState::Pending, Event::Settle(Settlement::Err { message })) => {
            Ok(TransitionResult::new(LifecycleState::Failed { message }).with_effect(Effect::Render))
        }

        (LifecycleState::Succeeded | LifecycleState::Failed { .. }, Event::Consume) => {
            Ok(TransitionResult::new(LifecycleState::Idle).with_effect(Effect::Render))
        }

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "{event:?} in state {state:?}"
        ))),
    }
}
