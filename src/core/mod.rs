pub mod edge;
pub mod graph;
pub mod node;

pub use edge::{CollapseId, Edge, EdgeKind};
pub use graph::{GraphBuilder, GraphStats, MutableGraph};
pub use node::{CommitInfo, Node, NodeId, NodeKind};
