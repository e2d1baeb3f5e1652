use std::collections::BTreeSet;
use std::rc::Rc;

use crate::core::{MutableGraph, NodeId};

use super::region::Fragment;

/// Predicate marking nodes that must stay on screen. Matching nodes are
/// never absorbed into a fragment's interior.
pub type PinnedNodes = Rc<dyn Fn(NodeId) -> bool>;

/// Finds the shortest collapsible run in one direction from a given node.
pub struct ShortFragmentGenerator {
    pinned: Option<PinnedNodes>,
}

impl ShortFragmentGenerator {
    pub fn new() -> Self {
        Self { pinned: None }
    }

    pub fn set_pinned_nodes(&mut self, pinned: PinnedNodes) {
        self.pinned = Some(pinned);
    }

    fn is_pinned(&self, node: NodeId) -> bool {
        self.pinned.as_ref().is_some_and(|p| p(node))
    }

    /// A node that can sit in the interior of a run: exactly one edge on
    /// each side and not pinned.
    fn is_chain_link(&self, graph: &MutableGraph, node: NodeId) -> bool {
        graph.up_edges(node).len() == 1
            && graph.down_edges(node).len() == 1
            && !self.is_pinned(node)
    }

    /// Shortest run downward from `start`: follows single down-edges through
    /// chain links and stops at the first node that is not one. `None` when
    /// `start` does not have exactly one down-edge. The intermediate set is
    /// empty when the very next node already ends the run.
    pub fn down_short_fragment(&self, graph: &MutableGraph, start: NodeId) -> Option<Fragment> {
        let down_edges = graph.down_edges(start);
        if down_edges.len() != 1 {
            return None;
        }
        let mut intermediates = BTreeSet::new();
        let mut current = down_edges[0].down;
        while self.is_chain_link(graph, current) {
            intermediates.insert(current);
            current = graph.down_edges(current)[0].down;
        }
        Some(Fragment::new(start, current, intermediates))
    }

    /// Symmetric to [`Self::down_short_fragment`], walking up-edges.
    pub fn up_short_fragment(&self, graph: &MutableGraph, start: NodeId) -> Option<Fragment> {
        let up_edges = graph.up_edges(start);
        if up_edges.len() != 1 {
            return None;
        }
        let mut intermediates = BTreeSet::new();
        let mut current = up_edges[0].up;
        while self.is_chain_link(graph, current) {
            intermediates.insert(current);
            current = graph.up_edges(current)[0].up;
        }
        Some(Fragment::new(current, start, intermediates))
    }
}

impl Default for ShortFragmentGenerator {
    fn default() -> Self {
        Self::new()
    }
}
