pub mod core;
pub mod fragment;
pub mod git_backend;
pub mod view;

pub use crate::core::{
    CollapseId, CommitInfo, Edge, EdgeKind, GraphBuilder, GraphStats, MutableGraph, Node, NodeId,
    NodeKind,
};
pub use crate::fragment::{
    DirectUpdates, Fragment, FragmentDecorator, FragmentError, FragmentGenerator, FragmentManager,
    GraphDecorator, GraphElement, PinnedNodes, ShortFragmentGenerator, UpdateListener,
    UpdateRequest,
};
pub use crate::git_backend::GitWalker;
pub use crate::view::{visible_rows, GraphRenderer, VisibleRow};
