use std::collections::HashMap;

use smallvec::SmallVec;

use super::edge::Edge;
use super::node::{CommitInfo, Node, NodeId, NodeKind};

/// Row-indexed commit graph.
///
/// Nodes and their structural edges are fixed after construction; the
/// collapsing engine only reads them and keeps its own overlay on the side.
#[derive(Debug, Clone)]
pub struct MutableGraph {
    nodes: Vec<Node>,
    rows: Vec<NodeId>,
}

impl MutableGraph {
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// One node per row, top (row 0, newest) to bottom.
    pub fn node_rows(&self) -> &[NodeId] {
        &self.rows
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn row_index(&self, id: NodeId) -> usize {
        self.node(id).row_index
    }

    pub fn up_edges(&self, id: NodeId) -> &[Edge] {
        &self.node(id).up_edges
    }

    pub fn down_edges(&self, id: NodeId) -> &[Edge] {
        &self.node(id).down_edges
    }

    pub fn commit(&self, id: NodeId) -> Option<&CommitInfo> {
        self.node(id).commit.as_ref()
    }

    /// The commit node sitting in `row`, if the row holds one.
    pub fn commit_node_in_row(&self, row: usize) -> Option<NodeId> {
        let id = *self.rows.get(row)?;
        (self.node(id).kind == NodeKind::Commit).then_some(id)
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        let commit_nodes = self
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Commit)
            .count();
        let merge_commits = self.nodes.iter().filter(|n| n.is_merge()).count();
        let edge_count = self.nodes.iter().map(|n| n.down_edges.len()).sum();

        GraphStats {
            total_nodes: self.nodes.len(),
            commit_nodes,
            not_loaded_nodes: self.nodes.len() - commit_nodes,
            edge_count,
            merge_commits,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub commit_nodes: usize,
    pub not_loaded_nodes: usize,
    pub edge_count: usize,
    pub merge_commits: usize,
}

/// Builds a [`MutableGraph`] from commits listed newest first (children
/// before parents, as a topological log walk emits them).
///
/// Parents that are never added become `NotLoaded` stub rows below the last
/// commit, so edges always have somewhere to land when the walk was cut off
/// by a limit.
pub struct GraphBuilder {
    nodes: Vec<Node>,
    parents: Vec<Vec<String>>,
    index: HashMap<String, NodeId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            parents: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append the next (older) commit row.
    pub fn add_commit(&mut self, info: CommitInfo, parents: Vec<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.index.insert(info.id.clone(), id);
        self.nodes.push(Node {
            kind: NodeKind::Commit,
            row_index: id.0,
            up_edges: SmallVec::new(),
            down_edges: SmallVec::new(),
            commit: Some(info),
        });
        self.parents.push(parents);
        id
    }

    pub fn build(mut self) -> MutableGraph {
        let commit_count = self.parents.len();
        let mut links: Vec<(NodeId, NodeId)> = Vec::new();

        for child_idx in 0..commit_count {
            let parent_ids = std::mem::take(&mut self.parents[child_idx]);
            for pid in parent_ids {
                let parent = match self.index.get(&pid) {
                    Some(&id) => id,
                    None => {
                        // history was cut off here; keep a stub to attach the edge to
                        let id = NodeId(self.nodes.len());
                        self.nodes.push(Node {
                            kind: NodeKind::NotLoaded,
                            row_index: id.0,
                            up_edges: SmallVec::new(),
                            down_edges: SmallVec::new(),
                            commit: None,
                        });
                        self.index.insert(pid, id);
                        id
                    }
                };
                links.push((NodeId(child_idx), parent));
            }
        }

        for (child, parent) in links {
            debug_assert!(
                self.nodes[parent.0].row_index > self.nodes[child.0].row_index,
                "commits must be listed newest first"
            );
            let edge = Edge::usual(child, parent);
            self.nodes[child.0].down_edges.push(edge);
            self.nodes[parent.0].up_edges.push(edge);
        }

        let rows = (0..self.nodes.len()).map(NodeId).collect();
        MutableGraph {
            nodes: self.nodes,
            rows,
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
