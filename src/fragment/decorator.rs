use std::collections::{HashMap, HashSet};

use crate::core::{CollapseId, Edge, NodeId};

use super::region::Fragment;

/// Per-node visibility capability the rendering layer queries while
/// drawing.
pub trait GraphDecorator {
    fn is_visible_node(&self, node: NodeId) -> bool;
    /// Synthetic edge bridging a collapsed run on the node's up side, if any.
    fn collapse_edge_above(&self, node: NodeId) -> Option<Edge>;
    /// Synthetic edge bridging a collapsed run on the node's down side.
    fn collapse_edge_below(&self, node: NodeId) -> Option<Edge>;
}

/// Hide/show overlay. Never touches the underlying graph: hidden nodes and
/// the synthetic edges bridging them live entirely here.
#[derive(Debug, Default)]
pub struct FragmentDecorator {
    hidden: HashSet<NodeId>,
    /// Keyed by a collapsed run's up boundary.
    edges_below: HashMap<NodeId, Vec<Edge>>,
    /// Keyed by a collapsed run's down boundary.
    edges_above: HashMap<NodeId, Vec<Edge>>,
    next_collapse: u64,
}

impl FragmentDecorator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapses `fragment`: marks its interior hidden and registers a
    /// fresh synthetic edge between the boundaries. Returns the minted id
    /// together with the edge.
    pub fn hide(&mut self, fragment: &Fragment) -> (CollapseId, Edge) {
        let id = CollapseId(self.next_collapse);
        self.next_collapse += 1;
        let edge = Edge::collapsed(fragment.up(), fragment.down(), id);
        self.edges_below.entry(fragment.up()).or_default().push(edge);
        self.edges_above.entry(fragment.down()).or_default().push(edge);
        self.hidden.extend(fragment.intermediates().iter().copied());
        (id, edge)
    }

    /// Expands `fragment` again. `edge` must be the edge `hide` returned
    /// for it; afterwards the overlay is exactly as before the hide.
    pub fn show(&mut self, fragment: &Fragment, edge: Edge) {
        Self::remove_edge(&mut self.edges_below, fragment.up(), edge);
        Self::remove_edge(&mut self.edges_above, fragment.down(), edge);
        for node in fragment.intermediates() {
            self.hidden.remove(node);
        }
    }

    fn remove_edge(map: &mut HashMap<NodeId, Vec<Edge>>, key: NodeId, edge: Edge) {
        if let Some(bucket) = map.get_mut(&key) {
            bucket.retain(|e| *e != edge);
            if bucket.is_empty() {
                map.remove(&key);
            }
        }
    }

    /// Raw bucket of collapse edges leaving `node` downward, including any
    /// whose far end a later collapse has hidden.
    pub fn collapse_edges_below(&self, node: NodeId) -> &[Edge] {
        self.edges_below.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn collapse_edges_above(&self, node: NodeId) -> &[Edge] {
        self.edges_above.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn hidden_node_count(&self) -> usize {
        self.hidden.len()
    }
}

impl GraphDecorator for FragmentDecorator {
    fn is_visible_node(&self, node: NodeId) -> bool {
        !self.hidden.contains(&node)
    }

    fn collapse_edge_above(&self, node: NodeId) -> Option<Edge> {
        self.collapse_edges_above(node)
            .iter()
            .copied()
            .find(|edge| self.is_visible_node(edge.up))
    }

    fn collapse_edge_below(&self, node: NodeId) -> Option<Edge> {
        self.collapse_edges_below(node)
            .iter()
            .copied()
            .find(|edge| self.is_visible_node(edge.down))
    }
}
