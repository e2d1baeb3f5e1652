use chrono::{DateTime, Utc};
use smallvec::SmallVec;

use super::edge::Edge;

/// Index of a node in the graph's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A real commit.
    Commit,
    /// Placeholder for a parent outside the loaded range of history.
    NotLoaded,
}

/// Commit metadata carried by `NodeKind::Commit` nodes.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// Commit ID (SHA)
    pub id: String,
    /// Author name
    pub author: String,
    /// Commit message (short)
    pub message: String,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
}

/// A vertex of the row-indexed commit graph.
///
/// `up_edges` lead toward smaller row indices (newer commits), `down_edges`
/// toward larger ones. Edge lists hold structural edges only; synthetic
/// collapse edges live in the overlay, never here.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub row_index: usize,
    pub up_edges: SmallVec<[Edge; 2]>,
    pub down_edges: SmallVec<[Edge; 2]>,
    pub commit: Option<CommitInfo>,
}

impl Node {
    /// Check if this commit has multiple parents
    pub fn is_merge(&self) -> bool {
        self.down_edges.len() > 1
    }

    /// Check if several children branch off this commit
    pub fn is_fork(&self) -> bool {
        self.up_edges.len() > 1
    }
}
