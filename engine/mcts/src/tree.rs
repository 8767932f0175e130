//! Search tree with arena allocation.
//!
//! Nodes live in a contiguous Vec and refer to each other by NodeId. A
//! parent owns its children through its `children` list; the `parent` field
//! is a plain index used only to walk back up. Nodes are never removed.

use std::fmt;

use engine_core::Link;

use crate::node::{NodeId, SearchNode};

/// Search tree with arena-based node storage.
#[derive(Debug)]
pub struct SearchTree {
    /// Arena storing all nodes
    nodes: Vec<SearchNode>,

    /// Root node index (always 0)
    root: NodeId,
}

impl Default for SearchTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchTree {
    /// Create a tree holding only the unvisited root.
    pub fn new() -> Self {
        Self {
            nodes: vec![SearchNode::new_root()],
            root: NodeId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a child under `parent_id`, seeded with `score`.
    pub fn add_child(&mut self, parent_id: NodeId, link: Link, score: f32) -> NodeId {
        let depth = self.get(parent_id).depth + 1;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes
            .push(SearchNode::new_child(parent_id, link, depth, score));
        self.get_mut(parent_id).children.push(id);
        id
    }

    /// Child of `node_id` with the highest UCT score among reachable ones.
    /// Ties go to the earlier (better-ranked) child.
    pub fn select_child(&self, node_id: NodeId, exploration: f32) -> Option<NodeId> {
        let node = self.get(node_id);
        let mut best: Option<(NodeId, f32)> = None;

        for &child_id in &node.children {
            let child = self.get(child_id);
            if child.unreachable {
                continue;
            }
            let score = child.uct_score(node.visit_count, exploration);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child_id, score));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Add `score` and one visit to `leaf_id` and every ancestor. `ascend`
    /// runs each time the walk moves from a node to its parent, after the
    /// node itself was updated, so it fires once per click below the root.
    pub fn backpropagate<E>(
        &mut self,
        leaf_id: NodeId,
        score: f32,
        mut ascend: impl FnMut() -> Result<(), E>,
    ) -> Result<(), E> {
        let mut current_id = leaf_id;
        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.cumulative_score += score;
            node.visit_count += 1;

            current_id = node.parent;
            if current_id.is_some() {
                ascend()?;
            }
        }
        Ok(())
    }

    /// Clear the unreachable flag on every child of `node_id`.
    pub fn clear_unreachable(&mut self, node_id: NodeId) {
        let children = self.get(node_id).children.clone();
        for child in children {
            self.get_mut(child).unreachable = false;
        }
    }

    /// Whether `node_id` has children but none of them can be selected.
    pub fn all_children_unreachable(&self, node_id: NodeId) -> bool {
        let node = self.get(node_id);
        node.is_expanded() && node.children.iter().all(|&c| self.get(c).unreachable)
    }

    /// Topics clicked from the root down to `node_id`.
    pub fn topics_to(&self, node_id: NodeId) -> Vec<String> {
        let mut topics = Vec::new();
        let mut current = node_id;
        while current.is_some() {
            let node = self.get(current);
            if let Some(topic) = node.topic() {
                topics.push(topic.to_string());
            }
            current = node.parent;
        }
        topics.reverse();
        topics
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: self.get(self.root).visit_count,
            max_depth: self.nodes.iter().map(|n| n.depth).max().unwrap_or(0),
        }
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId) -> fmt::Result {
        let node = self.get(id);
        writeln!(
            f,
            "{}Node(title={}, score={:.4}, visits={}{})",
            "-".repeat(node.depth as usize),
            node.title(),
            node.mean_score(),
            node.visit_count,
            if node.unreachable { ", unreachable" } else { "" }
        )?;
        for &child in &node.children {
            self.fmt_node(f, child)?;
        }
        Ok(())
    }
}

impl fmt::Display for SearchTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root)
    }
}

/// Statistics about a search tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(topic: &str) -> Link {
        Link::to_topic(topic)
    }

    #[test]
    fn test_new_tree() {
        let tree = SearchTree::new();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId(0));
        assert!(tree.get(tree.root()).parent.is_none());
        assert_eq!(tree.get(tree.root()).visit_count, 0);
    }

    #[test]
    fn test_add_child() {
        let mut tree = SearchTree::new();
        let child = tree.add_child(tree.root(), link("Paris"), 0.5);

        assert_eq!(child, NodeId(1));
        assert_eq!(tree.get(tree.root()).children, vec![child]);
        assert_eq!(tree.get(child).parent, tree.root());
        assert_eq!(tree.get(child).depth, 1);
    }

    #[test]
    fn test_backpropagate_updates_every_ancestor() {
        let mut tree = SearchTree::new();
        let child = tree.add_child(tree.root(), link("A"), 0.5);
        let grandchild = tree.add_child(child, link("B"), 0.2);

        let mut ascents = 0;
        tree.backpropagate(grandchild, 0.9, || -> Result<(), ()> {
            ascents += 1;
            Ok(())
        })
        .unwrap();

        assert_eq!(ascents, 2);
        assert_eq!(tree.get(grandchild).visit_count, 2);
        assert_eq!(tree.get(child).visit_count, 2);
        assert_eq!(tree.get(tree.root()).visit_count, 1);
        assert!((tree.get(grandchild).cumulative_score - 1.1).abs() < 1e-6);
        assert!((tree.get(child).cumulative_score - 1.4).abs() < 1e-6);
        assert!((tree.get(tree.root()).cumulative_score - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_backpropagate_stops_on_error() {
        let mut tree = SearchTree::new();
        let child = tree.add_child(tree.root(), link("A"), 0.5);

        let result = tree.backpropagate(child, 1.0, || Err("navigator gone"));
        assert_eq!(result, Err("navigator gone"));
        assert_eq!(tree.get(child).visit_count, 2);
        assert_eq!(tree.get(tree.root()).visit_count, 0);
    }

    #[test]
    fn test_select_child_prefers_higher_mean_on_first_visit() {
        let mut tree = SearchTree::new();
        tree.add_child(tree.root(), link("Low"), 0.1);
        let high = tree.add_child(tree.root(), link("High"), 0.9);
        tree.get_mut(tree.root()).visit_count = 1;

        assert_eq!(tree.select_child(tree.root(), std::f32::consts::SQRT_2), Some(high));
    }

    #[test]
    fn test_select_child_explores_less_visited() {
        let mut tree = SearchTree::new();
        let popular = tree.add_child(tree.root(), link("Popular"), 0.0);
        let fresh = tree.add_child(tree.root(), link("Fresh"), 0.0);
        tree.get_mut(popular).visit_count = 50;
        tree.get_mut(popular).cumulative_score = 25.0;
        tree.get_mut(fresh).cumulative_score = 0.4;
        tree.get_mut(tree.root()).visit_count = 51;

        assert_eq!(tree.select_child(tree.root(), std::f32::consts::SQRT_2), Some(fresh));
    }

    #[test]
    fn test_unreachable_children_are_skipped() {
        let mut tree = SearchTree::new();
        let best = tree.add_child(tree.root(), link("Best"), 0.9);
        let other = tree.add_child(tree.root(), link("Other"), 0.1);
        tree.get_mut(tree.root()).visit_count = 1;

        tree.get_mut(best).unreachable = true;
        assert_eq!(tree.select_child(tree.root(), 1.0), Some(other));

        tree.get_mut(other).unreachable = true;
        assert!(tree.all_children_unreachable(tree.root()));
        assert_eq!(tree.select_child(tree.root(), 1.0), None);

        tree.clear_unreachable(tree.root());
        assert_eq!(tree.select_child(tree.root(), 1.0), Some(best));
    }

    #[test]
    fn test_topics_to() {
        let mut tree = SearchTree::new();
        let a = tree.add_child(tree.root(), link("A"), 0.5);
        let b = tree.add_child(a, link("B"), 0.5);
        assert_eq!(tree.topics_to(b), vec!["A", "B"]);
        assert!(tree.topics_to(tree.root()).is_empty());
    }

    #[test]
    fn test_tree_stats_and_display() {
        let mut tree = SearchTree::new();
        let a = tree.add_child(tree.root(), link("A"), 0.5);
        tree.add_child(a, link("B"), 0.25);

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 3);
        assert_eq!(stats.max_depth, 2);

        let rendered = tree.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("-Node(title=A"));
        assert!(lines[2].starts_with("--Node(title=B"));
    }
}
