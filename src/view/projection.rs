use crate::core::{Edge, MutableGraph, NodeId};
use crate::fragment::GraphDecorator;

/// One row of the graph as it should currently be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    pub node: NodeId,
    /// Row index in the full, uncollapsed graph.
    pub row_index: usize,
    /// Collapse edge leaving this row downward, if a run is folded beneath it.
    pub collapse_below: Option<Edge>,
}

/// Project the graph through the overlay: hidden rows drop out, boundary
/// rows learn what is folded beneath them.
pub fn visible_rows(graph: &MutableGraph, decorator: &dyn GraphDecorator) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    for (row_index, &node) in graph.node_rows().iter().enumerate() {
        if !decorator.is_visible_node(node) {
            continue;
        }
        rows.push(VisibleRow {
            node,
            row_index,
            collapse_below: decorator.collapse_edge_below(node),
        });
    }
    rows
}
