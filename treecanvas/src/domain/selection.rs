//! The currently active node.

use tracing::info;

use crate::domain::arena::TreeArena;
use crate::domain::ids::NodeId;

/// Selected node id. Always refers to a live node of the owning model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    current: NodeId,
}

impl Selection {
    pub(crate) fn new(id: NodeId) -> Self {
        Self { current: id }
    }

    pub fn get(&self) -> NodeId {
        self.current
    }

    pub(crate) fn set(&mut self, id: NodeId) {
        self.current = id;
    }

    /// Moves the selection to `fallback` if it no longer resolves in `tree`.
    ///
    /// Returns true when the selection changed.
    pub(crate) fn revalidate(&mut self, tree: &TreeArena, fallback: NodeId) -> bool {
        if tree.contains(self.current) {
            return false;
        }
        info!(
            removed = %self.current,
            fallback = %fallback,
            "selected node was pruned, selecting surviving ancestor"
        );
        self.current = fallback;
        true
    }
}
