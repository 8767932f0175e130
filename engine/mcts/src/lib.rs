//! Monte Carlo Tree Search over the live link game.
//!
//! Unlike a simulator-backed MCTS, every tree edge here is a real click:
//! the search tree grows while the navigator walks the game, and moving back
//! up the tree costs one back navigation per level.
//!
//! # Overview
//!
//! Each iteration consists of:
//!
//! 1. **Selection**: while the current node has children, pick the child
//!    with the best UCT score and click its link
//! 2. **Expansion**: at a leaf, rank the page's links against the goal and
//!    add the top `max_breadth` as children, seeded with their similarity
//! 3. **Rollout**: the best child's similarity stands in for a playout
//! 4. **Backpropagation**: add the rollout score to every node on the path
//!    and navigate back once per level until the start page is reached
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use engine_core::{GameRunner, RunnerConfig, SimulatedNavigator, StopSignal, World};
//! use mcts::{MctsConfig, MctsStrategy};
//! use similarity::{EmbeddingCache, HashingEmbedder, SimilarityRanker};
//!
//! let ranker = SimilarityRanker::new(Arc::new(HashingEmbedder::default()), EmbeddingCache::new());
//! let strategy = MctsStrategy::new(ranker, MctsConfig::default());
//! let navigator = SimulatedNavigator::new(World::load("world.json".as_ref())?);
//!
//! let mut runner = GameRunner::new(strategy, navigator, RunnerConfig::default(), StopSignal::new());
//! runner.run()?;
//! ```

pub mod config;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use node::{NodeId, SearchNode};
pub use search::{MctsStrategy, MCTS_BOT_NAME};
pub use tree::{SearchTree, TreeStats};
