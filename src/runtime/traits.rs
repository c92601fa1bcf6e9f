//! Presentation boundary
//!
//! The core calls `render` after every transition; implementations redraw
//! idempotently from the snapshot they are given.

use super::Snapshot;
use crate::state_machine::Surface;
use std::sync::Arc;

/// Sink receiving immutable surface snapshots
pub trait RenderSink: Send + Sync {
    fn render(&self, surface: Surface, snapshot: Snapshot);
}

impl<T: RenderSink + ?Sized> RenderSink for Arc<T> {
    fn render(&self, surface: Surface, snapshot: Snapshot) {
        (**self).render(surface, snapshot);
    }
}
