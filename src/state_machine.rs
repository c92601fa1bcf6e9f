//! Per-surface request lifecycle
//!
//! Pure state transitions in the Elm Architecture style: the orchestrator
//! feeds events in and executes the effects that come back.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::{Event, Settlement};
pub use state::{LifecycleState, Surface};
pub use transition::{transition, TransitionError, TransitionResult};
