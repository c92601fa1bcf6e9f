//! Orchestration of the predict, advice, chat and voice surfaces
//!
//! The orchestrator owns every piece of surface state, turns user actions
//! into gateway calls, and pushes a snapshot to the render sink after each
//! lifecycle transition.

mod orchestrator;
pub mod snapshot;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use orchestrator::Orchestrator;
pub use snapshot::Snapshot;
pub use traits::*;

use crate::gateway::{HttpGateway, LoggingGateway};

/// Type alias for the production orchestrator
pub type ProductionOrchestrator<R> = Orchestrator<LoggingGateway<HttpGateway>, R>;
