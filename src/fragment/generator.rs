use crate::core::{MutableGraph, NodeId, NodeKind};

use super::region::Fragment;
use super::short::{PinnedNodes, ShortFragmentGenerator};

/// Upper bound on the ancestor walk in [`FragmentGenerator::fragment`].
const SEARCH_LIMIT: usize = 20;

/// Computes the maximal collapsible fragment around a node by chaining
/// short runs in both directions.
pub struct FragmentGenerator {
    short: ShortFragmentGenerator,
    pinned: Option<PinnedNodes>,
}

impl FragmentGenerator {
    pub fn new() -> Self {
        Self {
            short: ShortFragmentGenerator::new(),
            pinned: None,
        }
    }

    /// Nodes matching the predicate stay visible: they terminate runs and
    /// are never absorbed as intermediates.
    pub fn set_pinned_nodes(&mut self, pinned: PinnedNodes) {
        self.short.set_pinned_nodes(pinned.clone());
        self.pinned = Some(pinned);
    }

    fn is_pinned(&self, node: NodeId) -> bool {
        self.pinned.as_ref().is_some_and(|p| p(node))
    }

    /// The maximal fragment around `node`, or `None` when nothing
    /// collapsible is reachable from it.
    pub fn fragment(&self, graph: &MutableGraph, node: NodeId) -> Option<Fragment> {
        let mut anchor = node;
        let mut down = None;
        for _ in 0..SEARCH_LIMIT {
            if let Some(found) = self.maximum_down_fragment(graph, anchor) {
                down = Some(found);
                break;
            }
            // the query point may be a merge or stub; retry from an ancestor
            match graph.up_edges(anchor).first() {
                Some(edge) => anchor = edge.up,
                None => return None,
            }
        }
        let down = down?;

        if self.is_pinned(anchor) {
            // a pinned anchor stays a visible boundary, it cannot join the interior
            return Some(down);
        }
        let up = match self.maximum_up_fragment(graph, anchor) {
            Some(up) => up,
            None => return Some(down),
        };

        let mut intermediates = up.intermediates().clone();
        intermediates.extend(down.intermediates().iter().copied());
        intermediates.insert(anchor);
        Some(Fragment::new(up.up(), down.down(), intermediates))
    }

    /// Greedy downward extension from `start`. `None` unless `start` is a
    /// commit node and at least one intermediate accumulates.
    pub fn maximum_down_fragment(&self, graph: &MutableGraph, start: NodeId) -> Option<Fragment> {
        if graph.kind(start) != NodeKind::Commit {
            return None;
        }
        let first = self.short.down_short_fragment(graph, start)?;
        let mut intermediates = first.intermediates().clone();
        let mut end = first.down();
        while let Some(next) = self.short.down_short_fragment(graph, end) {
            // absorbing the joint requires it to be a plain chain link;
            // a second up-edge means another branch lands on it
            if self.is_pinned(end) || graph.up_edges(end).len() != 1 {
                break;
            }
            intermediates.insert(end);
            intermediates.extend(next.intermediates().iter().copied());
            end = next.down();
        }
        if intermediates.is_empty() {
            return None;
        }
        Some(Fragment::new(start, end, intermediates))
    }

    /// Greedy upward extension from `start`; the end reached becomes the
    /// fragment's up boundary. May return an empty-interior fragment, which
    /// only makes sense as a merge partner in [`Self::fragment`].
    pub fn maximum_up_fragment(&self, graph: &MutableGraph, start: NodeId) -> Option<Fragment> {
        let first = self.short.up_short_fragment(graph, start)?;
        let mut intermediates = first.intermediates().clone();
        let mut end = first.up();
        while let Some(next) = self.short.up_short_fragment(graph, end) {
            if self.is_pinned(end) || graph.down_edges(end).len() != 1 {
                break;
            }
            intermediates.insert(end);
            intermediates.extend(next.intermediates().iter().copied());
            end = next.up();
        }
        Some(Fragment::new(end, start, intermediates))
    }
}

impl Default for FragmentGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CommitInfo, GraphBuilder};
    use chrono::Utc;
    use std::rc::Rc;

    fn info(id: &str) -> CommitInfo {
        CommitInfo {
            id: id.to_string(),
            author: "Alice".to_string(),
            message: format!("commit {id}"),
            timestamp: Utc::now(),
        }
    }

    fn chain(ids: &[&str]) -> MutableGraph {
        let mut builder = GraphBuilder::new();
        for (i, id) in ids.iter().enumerate() {
            let parents = match ids.get(i + 1) {
                Some(parent) => vec![parent.to_string()],
                None => vec![],
            };
            builder.add_commit(info(id), parents);
        }
        builder.build()
    }

    /// Fork above, straight run, merge below:
    ///
    /// ```text
    /// x   y
    ///  \ /
    ///   a - b - c - d
    ///               |\
    ///              e1 e2
    /// ```
    fn bounded_run() -> MutableGraph {
        let mut builder = GraphBuilder::new();
        builder.add_commit(info("x"), vec!["a".to_string()]);
        builder.add_commit(info("y"), vec!["a".to_string()]);
        builder.add_commit(info("a"), vec!["b".to_string()]);
        builder.add_commit(info("b"), vec!["c".to_string()]);
        builder.add_commit(info("c"), vec!["d".to_string()]);
        builder.add_commit(info("d"), vec!["e1".to_string(), "e2".to_string()]);
        builder.add_commit(info("e1"), vec![]);
        builder.add_commit(info("e2"), vec![]);
        builder.build()
    }

    #[test]
    fn interior_nodes_see_the_whole_chain() {
        let graph = chain(&["a", "b", "c", "d", "e"]);
        let gen = FragmentGenerator::new();

        for interior in [NodeId(1), NodeId(2), NodeId(3)] {
            let fragment = gen.fragment(&graph, interior).unwrap();
            assert_eq!(fragment.up(), NodeId(0), "from {interior:?}");
            assert_eq!(fragment.down(), NodeId(4), "from {interior:?}");
            assert_eq!(fragment.len(), 3, "from {interior:?}");
        }
    }

    #[test]
    fn top_of_chain_anchors_the_same_run() {
        let graph = chain(&["a", "b", "c", "d", "e"]);
        let gen = FragmentGenerator::new();

        let fragment = gen.fragment(&graph, NodeId(0)).unwrap();
        assert_eq!(fragment.up(), NodeId(0));
        assert_eq!(fragment.down(), NodeId(4));
        assert_eq!(fragment.len(), 3);
    }

    #[test]
    fn boundaries_with_branch_structure_stay_outside() {
        let graph = bounded_run();
        let gen = FragmentGenerator::new();

        // b is row 3, c row 4; a (row 2) forks upward, d (row 5) merges downward
        let fragment = gen.fragment(&graph, NodeId(3)).unwrap();
        assert_eq!(fragment.up(), NodeId(2));
        assert_eq!(fragment.down(), NodeId(5));
        assert_eq!(
            fragment.intermediates().iter().copied().collect::<Vec<_>>(),
            vec![NodeId(3), NodeId(4)]
        );
        assert!(!fragment.contains(NodeId(2)));
        assert!(!fragment.contains(NodeId(5)));
    }

    #[test]
    fn merge_point_is_never_an_intermediate() {
        // m joins two one-commit branches, then a straight run below
        let mut builder = GraphBuilder::new();
        builder.add_commit(info("p"), vec!["m".to_string()]);
        builder.add_commit(info("q"), vec!["m".to_string()]);
        builder.add_commit(info("m"), vec!["c".to_string()]);
        builder.add_commit(info("c"), vec!["d".to_string()]);
        builder.add_commit(info("d"), vec!["e".to_string()]);
        builder.add_commit(info("e"), vec![]);
        let graph = builder.build();
        let gen = FragmentGenerator::new();

        let m = NodeId(2);
        for node in [NodeId(0), NodeId(3), NodeId(4)] {
            if let Some(fragment) = gen.fragment(&graph, node) {
                assert!(!fragment.contains(m), "fragment from {node:?} absorbed the join");
            }
        }

        // the run below the join anchors at the join itself
        let below = gen.maximum_down_fragment(&graph, m).unwrap();
        assert_eq!(below.up(), m);
        assert_eq!(below.down(), NodeId(5));
        assert_eq!(below.len(), 2);
    }

    #[test]
    fn pinned_node_splits_the_chain() {
        let graph = chain(&["a", "b", "c", "d", "e"]);
        let mut gen = FragmentGenerator::new();
        gen.set_pinned_nodes(Rc::new(|node| node == NodeId(2)));

        let above = gen.fragment(&graph, NodeId(1)).unwrap();
        assert_eq!(above.down(), NodeId(2));
        assert!(!above.contains(NodeId(2)));

        let below = gen.fragment(&graph, NodeId(3)).unwrap();
        assert_eq!(below.up(), NodeId(2));
        assert!(!below.contains(NodeId(2)));
    }

    #[test]
    fn fully_pinned_chain_has_no_fragment() {
        let graph = chain(&["a", "b", "c", "d", "e"]);
        let mut gen = FragmentGenerator::new();
        gen.set_pinned_nodes(Rc::new(|_| true));

        for row in 0..5 {
            assert!(gen.fragment(&graph, NodeId(row)).is_none());
        }
    }

    #[test]
    fn isolated_node_has_no_fragment() {
        let graph = chain(&["only"]);
        let gen = FragmentGenerator::new();
        assert!(gen.fragment(&graph, NodeId(0)).is_none());
    }

    #[test]
    fn two_node_chain_has_nothing_to_collapse() {
        let graph = chain(&["a", "b"]);
        let gen = FragmentGenerator::new();
        assert!(gen.maximum_down_fragment(&graph, NodeId(0)).is_none());
        assert!(gen.fragment(&graph, NodeId(0)).is_none());
    }

    #[test]
    fn stub_rows_never_anchor_fragments() {
        let mut builder = GraphBuilder::new();
        builder.add_commit(info("a"), vec!["b".to_string()]);
        builder.add_commit(info("b"), vec!["zzz".to_string()]);
        let graph = builder.build();
        let gen = FragmentGenerator::new();

        // row 2 is the not-loaded stub for zzz
        assert_eq!(graph.kind(NodeId(2)), NodeKind::NotLoaded);
        assert!(gen.maximum_down_fragment(&graph, NodeId(2)).is_none());
    }
}
