//! Effects produced by state transitions

/// Effects to be executed after a state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Issue the surface's single network call
    Dispatch,

    /// Hand a fresh snapshot to the render sink
    Render,
}
