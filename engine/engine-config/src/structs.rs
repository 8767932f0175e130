//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_data_dir() -> String {
    defaults::data_dir().into()
}
fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_strategy() -> String {
    defaults::strategy().into()
}
fn d_max_games() -> u32 {
    defaults::max_games()
}
fn d_max_idle_ticks() -> u32 {
    defaults::max_idle_ticks()
}
fn d_world_path() -> String {
    defaults::world_path().into()
}
fn d_graph_db_path() -> String {
    defaults::graph_db_path().into()
}
fn d_dimensions() -> usize {
    defaults::dimensions()
}
fn d_certainty_decay() -> f64 {
    defaults::certainty_decay()
}
fn d_waypoint() -> String {
    defaults::waypoint().into()
}
fn d_trigger_topic() -> String {
    defaults::trigger_topic().into()
}
fn d_random_interval() -> usize {
    defaults::random_interval()
}
fn d_explore_pause() -> u64 {
    defaults::explore_win_pause_ms()
}
fn d_iddfs_breadth() -> usize {
    defaults::iddfs_max_breadth()
}
fn d_iddfs_depth() -> usize {
    defaults::iddfs_max_depth()
}
fn d_max_pages() -> usize {
    defaults::max_pages()
}
fn d_widen_step() -> usize {
    defaults::widen_step()
}
fn d_mcts_breadth() -> usize {
    defaults::mcts_max_breadth()
}
fn d_exploration() -> f64 {
    defaults::exploration()
}
fn d_mcts_pause() -> u64 {
    defaults::mcts_win_pause_ms()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub similarity: SimilarityConfig,
    #[serde(default)]
    pub explore: ExploreConfig,
    #[serde(default)]
    pub iddfs: IddfsConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_data_dir")]
    pub data_dir: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir().into(),
            log_level: defaults::log_level().into(),
        }
    }
}

/// Game session configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    #[serde(default = "d_strategy")]
    pub strategy: String,
    /// Group code announced when joining a game (None = public game)
    #[serde(default)]
    pub group_code: Option<String>,
    /// Number of games to play (0 = until interrupted)
    #[serde(default = "d_max_games")]
    pub max_games: u32,
    #[serde(default = "d_max_idle_ticks")]
    pub max_idle_ticks: u32,
    /// JSON world file driving the simulated navigator
    #[serde(default = "d_world_path")]
    pub world_path: String,
    /// SQLite link graph used by IDDFS (falls back to the world graph when absent)
    #[serde(default = "d_graph_db_path")]
    pub graph_db_path: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            strategy: defaults::strategy().into(),
            group_code: None,
            max_games: defaults::max_games(),
            max_idle_ticks: defaults::max_idle_ticks(),
            world_path: defaults::world_path().into(),
            graph_db_path: defaults::graph_db_path().into(),
        }
    }
}

/// Embedding configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimilarityConfig {
    #[serde(default = "d_dimensions")]
    pub dimensions: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            dimensions: defaults::dimensions(),
        }
    }
}

/// Greedy and biased exploration configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExploreConfig {
    #[serde(default = "d_certainty_decay")]
    pub certainty_decay: f64,
    #[serde(default = "d_waypoint")]
    pub waypoint: String,
    #[serde(default = "d_trigger_topic")]
    pub trigger_topic: String,
    #[serde(default = "d_random_interval")]
    pub random_interval: usize,
    #[serde(default = "d_explore_pause")]
    pub win_pause_ms: u64,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            certainty_decay: defaults::certainty_decay(),
            waypoint: defaults::waypoint().into(),
            trigger_topic: defaults::trigger_topic().into(),
            random_interval: defaults::random_interval(),
            win_pause_ms: defaults::explore_win_pause_ms(),
        }
    }
}

/// Iterative deepening search configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct IddfsConfig {
    #[serde(default = "d_iddfs_breadth")]
    pub max_breadth: usize,
    #[serde(default = "d_iddfs_depth")]
    pub max_depth: usize,
    #[serde(default = "d_max_pages")]
    pub max_pages: usize,
    #[serde(default = "d_widen_step")]
    pub widen_step: usize,
}

impl Default for IddfsConfig {
    fn default() -> Self {
        Self {
            max_breadth: defaults::iddfs_max_breadth(),
            max_depth: defaults::iddfs_max_depth(),
            max_pages: defaults::max_pages(),
            widen_step: defaults::widen_step(),
        }
    }
}

/// MCTS (Monte Carlo Tree Search) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_mcts_breadth")]
    pub max_breadth: usize,
    #[serde(default = "d_exploration")]
    pub exploration: f64,
    #[serde(default = "d_mcts_pause")]
    pub win_pause_ms: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            max_breadth: defaults::mcts_max_breadth(),
            exploration: defaults::exploration(),
            win_pause_ms: defaults::mcts_win_pause_ms(),
        }
    }
}
