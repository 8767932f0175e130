//! MCTS tree node representation.
//!
//! Each node stands for a page reached by clicking its link from the parent
//! page. The root is the round's start page and carries no link.

use engine_core::Link;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Parent node index (NONE for root). Used only to walk upwards.
    pub parent: NodeId,

    /// Link clicked on the parent page to reach this node (None for root)
    pub link: Option<Link>,

    /// Number of clicks from the root
    pub depth: u32,

    /// Children in ranking order. Empty until expanded.
    pub children: Vec<NodeId>,

    /// Sum of similarity scores seeded at creation and backpropagated since
    pub cumulative_score: f32,

    pub visit_count: u32,

    /// Set when clicking this node's link failed; excluded from selection
    pub unreachable: bool,
}

impl SearchNode {
    /// Create a new root node. The root starts unvisited.
    pub fn new_root() -> Self {
        Self {
            parent: NodeId::NONE,
            link: None,
            depth: 0,
            children: Vec::new(),
            cumulative_score: 0.0,
            visit_count: 0,
            unreachable: false,
        }
    }

    /// Create a new child seeded with its similarity score as one visit.
    pub fn new_child(parent: NodeId, link: Link, depth: u32, score: f32) -> Self {
        Self {
            parent,
            link: Some(link),
            depth,
            children: Vec::new(),
            cumulative_score: score,
            visit_count: 1,
            unreachable: false,
        }
    }

    /// Mean score = cumulative_score / visit_count, or 0.0 if never visited.
    #[inline]
    pub fn mean_score(&self) -> f32 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.cumulative_score / self.visit_count as f32
        }
    }

    /// UCT score for selection from a parent with `parent_visits` visits:
    /// `mean + c * sqrt(2 * ln(parent_visits) / visits)`.
    ///
    /// An unvisited child scores +inf so it is tried first.
    #[inline]
    pub fn uct_score(&self, parent_visits: u32, exploration: f32) -> f32 {
        if self.visit_count == 0 {
            return f32::INFINITY;
        }
        let ln_parent = (parent_visits.max(1) as f32).ln();
        let bonus = (2.0 * ln_parent / self.visit_count as f32).sqrt();
        self.mean_score() + exploration * bonus
    }

    /// Check if this node has been expanded (has children).
    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Title of the link leading here, empty for the root.
    pub fn title(&self) -> &str {
        self.link.as_ref().map(Link::label).unwrap_or("")
    }

    /// Topic of the page this node stands for, None for the root.
    pub fn topic(&self) -> Option<&str> {
        self.link.as_ref().map(Link::topic)
    }
}
