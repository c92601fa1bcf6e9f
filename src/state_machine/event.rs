//! Events that drive a surface's lifecycle

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// User submitted; the orchestrator has already checked the precondition
    Submit { precondition_met: bool },

    /// The gateway call finished
    Settle(Settlement),

    /// The orchestrator applied the settled outcome
    Consume,
}

/// How an in-flight request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Ok,
    Err { message: String },
}

impl Event {
    pub fn submit(precondition_met: bool) -> Self {
        Event::Submit { precondition_met }
    }

    pub fn settled_ok() -> Self {
        Event::Settle(Settlement::Ok)
    }

    pub fn settled_err(message: impl Into<String>) -> Self {
        Event::Settle(Settlement::Err {
            message: message.into(),
        })
    }
}
