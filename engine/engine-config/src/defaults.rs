//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time, so the binary runs with
//! sensible settings even when no config.toml is present.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    game: GameDefaults,
    similarity: SimilarityDefaults,
    explore: ExploreDefaults,
    iddfs: IddfsDefaults,
    mcts: MctsDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    data_dir: String,
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct GameDefaults {
    strategy: String,
    max_games: u32,
    max_idle_ticks: u32,
    world_path: String,
    graph_db_path: String,
}

#[derive(Debug, Deserialize)]
struct SimilarityDefaults {
    dimensions: usize,
}

#[derive(Debug, Deserialize)]
struct ExploreDefaults {
    certainty_decay: f64,
    waypoint: String,
    trigger_topic: String,
    random_interval: usize,
    win_pause_ms: u64,
}

#[derive(Debug, Deserialize)]
struct IddfsDefaults {
    max_breadth: usize,
    max_depth: usize,
    max_pages: usize,
    widen_step: usize,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    max_breadth: usize,
    exploration: f64,
    win_pause_ms: u64,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn data_dir() -> &'static str {
    &DEFAULTS.common.data_dir
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Game
pub fn strategy() -> &'static str {
    &DEFAULTS.game.strategy
}
pub fn max_games() -> u32 {
    DEFAULTS.game.max_games
}
pub fn max_idle_ticks() -> u32 {
    DEFAULTS.game.max_idle_ticks
}
pub fn world_path() -> &'static str {
    &DEFAULTS.game.world_path
}
pub fn graph_db_path() -> &'static str {
    &DEFAULTS.game.graph_db_path
}

// Similarity
pub fn dimensions() -> usize {
    DEFAULTS.similarity.dimensions
}

// Explore
pub fn certainty_decay() -> f64 {
    DEFAULTS.explore.certainty_decay
}
pub fn waypoint() -> &'static str {
    &DEFAULTS.explore.waypoint
}
pub fn trigger_topic() -> &'static str {
    &DEFAULTS.explore.trigger_topic
}
pub fn random_interval() -> usize {
    DEFAULTS.explore.random_interval
}
pub fn explore_win_pause_ms() -> u64 {
    DEFAULTS.explore.win_pause_ms
}

// IDDFS
pub fn iddfs_max_breadth() -> usize {
    DEFAULTS.iddfs.max_breadth
}
pub fn iddfs_max_depth() -> usize {
    DEFAULTS.iddfs.max_depth
}
pub fn max_pages() -> usize {
    DEFAULTS.iddfs.max_pages
}
pub fn widen_step() -> usize {
    DEFAULTS.iddfs.widen_step
}

// MCTS
pub fn mcts_max_breadth() -> usize {
    DEFAULTS.mcts.max_breadth
}
pub fn exploration() -> f64 {
    DEFAULTS.mcts.exploration
}
pub fn mcts_win_pause_ms() -> u64 {
    DEFAULTS.mcts.win_pause_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        // Just accessing these will verify the TOML parses correctly
        assert_eq!(data_dir(), "./data");
        assert_eq!(log_level(), "info");
        assert_eq!(strategy(), "greedy");
    }

    #[test]
    fn test_explore_defaults() {
        assert!((certainty_decay() - 0.8).abs() < f64::EPSILON);
        assert_eq!(waypoint(), "United States");
        assert_eq!(trigger_topic(), "United_States_of_America");
        assert_eq!(random_interval(), 7);
        assert_eq!(explore_win_pause_ms(), 3000);
    }

    #[test]
    fn test_search_defaults() {
        assert_eq!(iddfs_max_breadth(), 6);
        assert_eq!(iddfs_max_depth(), 6);
        assert_eq!(max_pages(), 250);
        assert_eq!(widen_step(), 1);
        assert_eq!(mcts_max_breadth(), 3);
        assert!((exploration() - std::f64::consts::SQRT_2).abs() < 1e-12);
        assert_eq!(mcts_win_pause_ms(), 1000);
    }
}
