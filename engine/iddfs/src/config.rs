//! IDDFS search bounds.

/// Configuration for the iterative deepening strategy.
#[derive(Debug, Clone)]
pub struct IddfsConfig {
    /// Children expanded per page after ranking against the goal.
    pub max_breadth: usize,

    /// Largest depth limit of the first solve. A limit of `d` finds paths
    /// of at most `d` clicks.
    pub max_depth: usize,

    /// Links considered per page before ranking.
    pub max_pages: usize,

    /// Added to both bounds after a solve yields nothing usable.
    pub widen_step: usize,
}

impl Default for IddfsConfig {
    fn default() -> Self {
        Self {
            max_breadth: 6,
            max_depth: 6,
            max_pages: 250,
            widen_step: 1,
        }
    }
}

impl IddfsConfig {
    /// Create a small config for testing.
    pub fn for_testing() -> Self {
        Self {
            max_breadth: 4,
            max_depth: 3,
            max_pages: 50,
            widen_step: 1,
        }
    }

    /// Builder pattern: set max breadth.
    pub fn with_max_breadth(mut self, breadth: usize) -> Self {
        self.max_breadth = breadth;
        self
    }

    /// Builder pattern: set max depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
