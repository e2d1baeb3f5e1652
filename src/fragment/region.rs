use std::collections::BTreeSet;

use crate::core::NodeId;

/// A collapsible run of the graph: the nodes strictly between `up` and
/// `down`, which themselves stay visible.
///
/// Pure value; whether the run is currently collapsed is tracked by the
/// manager and the overlay, never on the fragment. Two fragments are equal
/// when their boundaries and intermediate sets are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    up: NodeId,
    down: NodeId,
    intermediates: BTreeSet<NodeId>,
}

impl Fragment {
    pub fn new(up: NodeId, down: NodeId, intermediates: BTreeSet<NodeId>) -> Self {
        debug_assert!(up != down);
        Self {
            up,
            down,
            intermediates,
        }
    }

    /// Entry boundary (smaller row index).
    pub fn up(&self) -> NodeId {
        self.up
    }

    /// Exit boundary (larger row index).
    pub fn down(&self) -> NodeId {
        self.down
    }

    pub fn intermediates(&self) -> &BTreeSet<NodeId> {
        &self.intermediates
    }

    /// Number of rows a collapse would take off the screen.
    pub fn len(&self) -> usize {
        self.intermediates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intermediates.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.intermediates.contains(&node)
    }
}
