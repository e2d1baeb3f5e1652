use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::core::{CollapseId, Edge, EdgeKind, MutableGraph, NodeId};

use super::decorator::{FragmentDecorator, GraphDecorator};
use super::generator::FragmentGenerator;
use super::region::Fragment;
use super::short::PinnedNodes;

/// What the host layout layer should redo after a hide or show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateRequest {
    /// Nothing to relayout (a bulk operation is in progress).
    Nothing,
    /// Relayout confined to the given row range.
    Rows { top: usize, bottom: usize },
    /// Relayout everything.
    Full,
}

/// Hook into the host's layout/update queue. Called synchronously, before
/// the triggering `hide`/`show` returns; must not call back into the
/// manager.
pub trait UpdateListener {
    fn intermediate_update(&mut self, top_row: usize, bottom_row: usize) -> UpdateRequest;
    fn full_update(&mut self) -> UpdateRequest;
}

/// Listener that echoes the requested scope back as the update token.
#[derive(Debug, Default)]
pub struct DirectUpdates;

impl UpdateListener for DirectUpdates {
    fn intermediate_update(&mut self, top_row: usize, bottom_row: usize) -> UpdateRequest {
        UpdateRequest::Rows {
            top: top_row,
            bottom: bottom_row,
        }
    }

    fn full_update(&mut self) -> UpdateRequest {
        UpdateRequest::Full
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FragmentError {
    /// `hide` was called for a run that is already collapsed.
    #[error("fragment {up:?}..{down:?} is already collapsed")]
    AlreadyCollapsed { up: NodeId, down: NodeId },
    /// `show` was called for a run that is not collapsed.
    #[error("fragment {up:?}..{down:?} is not collapsed")]
    AlreadyExpanded { up: NodeId, down: NodeId },
    /// Overlay bookkeeping broke an internal invariant. Not recoverable;
    /// surfaced as a value so tests can observe it.
    #[error("graph overlay corrupted: {0}")]
    InvariantViolation(String),
}

/// What the user interacted with in the rendered graph.
#[derive(Debug, Clone, Copy)]
pub enum GraphElement {
    Node(NodeId),
    Edge(Edge),
}

/// Owns the overlay and arbitrates show/hide requests against it.
pub struct FragmentManager {
    generator: FragmentGenerator,
    decorator: FragmentDecorator,
    collapsed: HashMap<CollapseId, Fragment>,
    listener: Box<dyn UpdateListener>,
    updates_enabled: bool,
}

impl FragmentManager {
    pub fn new(listener: Box<dyn UpdateListener>) -> Self {
        Self {
            generator: FragmentGenerator::new(),
            decorator: FragmentDecorator::new(),
            collapsed: HashMap::new(),
            listener,
            updates_enabled: true,
        }
    }

    /// The visibility capability for the rendering layer.
    pub fn decorator(&self) -> &dyn GraphDecorator {
        &self.decorator
    }

    pub fn set_pinned_nodes(&mut self, pinned: PinnedNodes) {
        self.generator.set_pinned_nodes(pinned);
    }

    /// Fragment a collapse edge stands for, if the overlay knows it.
    pub fn collapsed_fragment(&self, edge: Edge) -> Option<&Fragment> {
        match edge.kind {
            EdgeKind::Collapsed(id) => self.collapsed.get(&id),
            EdgeKind::Usual => None,
        }
    }

    /// Resolve a clicked element to the fragment it stands for, if any.
    ///
    /// Elements touching an existing collapse edge resolve to the recorded
    /// fragment; anything else gets a freshly computed candidate, accepted
    /// only when it actually extends downward from the element.
    pub fn relate_fragment(
        &self,
        graph: &MutableGraph,
        element: GraphElement,
    ) -> Result<Option<Fragment>, FragmentError> {
        match element {
            GraphElement::Node(node) => {
                let touching = self
                    .decorator
                    .collapse_edge_below(node)
                    .or_else(|| self.decorator.collapse_edge_above(node));
                if let Some(edge) = touching {
                    return self.recorded_fragment(edge).map(Some);
                }
                let candidate = self.generator.fragment(graph, node);
                Ok(candidate.filter(|f| graph.row_index(f.down()) >= graph.row_index(node)))
            }
            GraphElement::Edge(edge) => {
                if let EdgeKind::Collapsed(_) = edge.kind {
                    return self.recorded_fragment(edge).map(Some);
                }
                let candidate = self.generator.fragment(graph, edge.up);
                Ok(candidate.filter(|f| graph.row_index(f.down()) >= graph.row_index(edge.down)))
            }
        }
    }

    fn recorded_fragment(&self, edge: Edge) -> Result<Fragment, FragmentError> {
        let EdgeKind::Collapsed(id) = edge.kind else {
            return Err(FragmentError::InvariantViolation(format!(
                "edge {edge:?} is not a collapse edge"
            )));
        };
        self.collapsed.get(&id).cloned().ok_or_else(|| {
            FragmentError::InvariantViolation(format!(
                "no fragment recorded for collapse edge {edge:?}"
            ))
        })
    }

    /// Collapse `fragment`.
    pub fn hide(
        &mut self,
        graph: &MutableGraph,
        fragment: &Fragment,
    ) -> Result<UpdateRequest, FragmentError> {
        if self.find_collapse_edge(fragment)?.is_some() {
            return Err(FragmentError::AlreadyCollapsed {
                up: fragment.up(),
                down: fragment.down(),
            });
        }
        let (id, edge) = self.decorator.hide(fragment);
        self.collapsed.insert(id, fragment.clone());
        debug!(?edge, hidden = fragment.len(), "collapsed fragment");
        Ok(self.after_change(graph, fragment))
    }

    /// Expand `fragment` again.
    pub fn show(
        &mut self,
        graph: &MutableGraph,
        fragment: &Fragment,
    ) -> Result<UpdateRequest, FragmentError> {
        let (id, edge) = match self.find_collapse_edge(fragment)? {
            Some(found) => found,
            None => {
                if self.decorator.collapse_edges_below(fragment.up()).is_empty() {
                    return Err(FragmentError::AlreadyExpanded {
                        up: fragment.up(),
                        down: fragment.down(),
                    });
                }
                return Err(FragmentError::InvariantViolation(format!(
                    "collapse edge below {:?} does not lead to {:?}",
                    fragment.up(),
                    fragment.down()
                )));
            }
        };
        self.decorator.show(fragment, edge);
        self.collapsed.remove(&id);
        debug!(?edge, "expanded fragment");
        Ok(self.after_change(graph, fragment))
    }

    /// Collapse every maximal linear run in the graph, top to bottom, then
    /// request a single full relayout.
    pub fn hide_all(&mut self, graph: &MutableGraph) -> Result<UpdateRequest, FragmentError> {
        self.updates_enabled = false;
        let scan = self.hide_all_rows(graph);
        self.updates_enabled = true;
        scan?;
        debug!(collapsed = self.collapsed.len(), "collapsed all linear runs");
        Ok(self.listener.full_update())
    }

    fn hide_all_rows(&mut self, graph: &MutableGraph) -> Result<(), FragmentError> {
        for row in 0..graph.row_count() {
            let node = match graph.commit_node_in_row(row) {
                Some(node) => node,
                None => continue,
            };
            // rows swallowed by an earlier collapse are already done
            if !self.decorator.is_visible_node(node) {
                continue;
            }
            if let Some(fragment) = self.generator.maximum_down_fragment(graph, node) {
                self.hide(graph, &fragment)?;
            }
        }
        Ok(())
    }

    /// The synthetic edge currently standing in for `fragment`, if any.
    fn find_collapse_edge(
        &self,
        fragment: &Fragment,
    ) -> Result<Option<(CollapseId, Edge)>, FragmentError> {
        let mut found = None;
        for edge in self.decorator.collapse_edges_below(fragment.up()) {
            let EdgeKind::Collapsed(id) = edge.kind else {
                continue;
            };
            if edge.down != fragment.down() {
                continue;
            }
            if found.is_some() {
                return Err(FragmentError::InvariantViolation(format!(
                    "duplicate collapse edges between {:?} and {:?}",
                    fragment.up(),
                    fragment.down()
                )));
            }
            found = Some((id, *edge));
        }
        Ok(found)
    }

    fn after_change(&mut self, graph: &MutableGraph, fragment: &Fragment) -> UpdateRequest {
        if !self.updates_enabled {
            return UpdateRequest::Nothing;
        }
        self.listener.intermediate_update(
            graph.row_index(fragment.up()),
            graph.row_index(fragment.down()),
        )
    }
}
