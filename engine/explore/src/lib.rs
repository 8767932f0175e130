//! Similarity-guided exploration strategies.
//!
//! - [`GreedyStrategy`]: follow the unvisited link most similar to the goal,
//!   with certainty-weighted acceptance of lower-ranked links
//! - [`BiasedStrategy`]: the same walk aimed at a waypoint until a trigger
//!   topic is reached, plus periodic uniformly random picks afterwards

pub mod biased;
pub mod certainty;
pub mod config;
pub mod explorer;
pub mod greedy;

pub use biased::{BiasedStrategy, BIASED_BOT_NAME};
pub use certainty::CertaintyTracker;
pub use config::ExploreConfig;
pub use explorer::{choose_uniform, choose_weighted, Explorer, Pick};
pub use greedy::{GreedyStrategy, GREEDY_BOT_NAME};
