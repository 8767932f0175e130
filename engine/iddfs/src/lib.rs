//! Iterative deepening search over an offline link graph.
//!
//! The [`IddfsPlanner`] searches a [`GraphDataStore`](engine_core::GraphDataStore)
//! for paths from the start page to the goal without touching the live game.
//! The [`IddfsStrategy`] then clicks each planned path through the
//! navigator, correcting the offline data against what the live pages show
//! and backtracking when a planned link turns out to be missing.

pub mod config;
pub mod page_cache;
pub mod planner;
pub mod strategy;

pub use config::IddfsConfig;
pub use page_cache::PageCache;
pub use planner::IddfsPlanner;
pub use strategy::{Execution, IddfsStrategy, IDDFS_BOT_NAME};
