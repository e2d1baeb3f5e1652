use super::node::NodeId;

/// Identity of one collapsed run. Minted by the overlay when a fragment is
/// hidden; the manager keys its fragment map by this id rather than by edge
/// equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollapseId(pub u64);

/// An edge connecting two rows of the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Endpoint with the smaller row index (the newer commit)
    pub up: NodeId,
    /// Endpoint with the larger row index (the parent side)
    pub down: NodeId,
    /// Edge type
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Structural parent link owned by the graph
    Usual,
    /// Synthetic edge bridging a collapsed run, owned by the overlay
    Collapsed(CollapseId),
}

impl Edge {
    pub fn usual(up: NodeId, down: NodeId) -> Self {
        Self {
            up,
            down,
            kind: EdgeKind::Usual,
        }
    }

    pub fn collapsed(up: NodeId, down: NodeId, id: CollapseId) -> Self {
        Self {
            up,
            down,
            kind: EdgeKind::Collapsed(id),
        }
    }
}
