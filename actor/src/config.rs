//! Configuration for the actor binary
//!
//! Defaults come from the central config (config.toml, embedded defaults and
//! `WIKIGAME_*` environment overrides). CLI arguments take highest priority.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

use engine_core::RunnerConfig;
use explore::ExploreConfig;
use iddfs::IddfsConfig;
use mcts::MctsConfig;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_strategy() -> String {
    CENTRAL_CONFIG.game.strategy.clone()
}

fn default_max_games() -> u32 {
    CENTRAL_CONFIG.game.max_games
}

fn default_max_idle_ticks() -> u32 {
    CENTRAL_CONFIG.game.max_idle_ticks
}

fn default_world_path() -> String {
    CENTRAL_CONFIG.game.world_path.clone()
}

fn default_graph_db_path() -> String {
    CENTRAL_CONFIG.game.graph_db_path.clone()
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_data_dir() -> String {
    CENTRAL_CONFIG.common.data_dir.clone()
}

fn default_dimensions() -> usize {
    CENTRAL_CONFIG.similarity.dimensions
}

fn default_certainty_decay() -> f64 {
    CENTRAL_CONFIG.explore.certainty_decay
}

fn default_waypoint() -> String {
    CENTRAL_CONFIG.explore.waypoint.clone()
}

fn default_trigger_topic() -> String {
    CENTRAL_CONFIG.explore.trigger_topic.clone()
}

fn default_random_interval() -> usize {
    CENTRAL_CONFIG.explore.random_interval
}

fn default_explore_win_pause_ms() -> u64 {
    CENTRAL_CONFIG.explore.win_pause_ms
}

fn default_iddfs_max_breadth() -> usize {
    CENTRAL_CONFIG.iddfs.max_breadth
}

fn default_iddfs_max_depth() -> usize {
    CENTRAL_CONFIG.iddfs.max_depth
}

fn default_max_pages() -> usize {
    CENTRAL_CONFIG.iddfs.max_pages
}

fn default_widen_step() -> usize {
    CENTRAL_CONFIG.iddfs.widen_step
}

fn default_mcts_max_breadth() -> usize {
    CENTRAL_CONFIG.mcts.max_breadth
}

fn default_exploration() -> f64 {
    CENTRAL_CONFIG.mcts.exploration
}

fn default_mcts_win_pause_ms() -> u64 {
    CENTRAL_CONFIG.mcts.win_pause_ms
}

/// Which strategy plays the games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Greedy,
    Biased,
    Iddfs,
    Mcts,
}

impl FromStr for StrategyKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "biased" => Ok(Self::Biased),
            "iddfs" => Ok(Self::Iddfs),
            "mcts" => Ok(Self::Mcts),
            other => Err(anyhow!(
                "unknown strategy '{}', expected one of greedy, biased, iddfs, mcts",
                other
            )),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Greedy => "greedy",
            Self::Biased => "biased",
            Self::Iddfs => "iddfs",
            Self::Mcts => "mcts",
        };
        f.write_str(name)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "wikigame-actor")]
#[command(about = "Plays the link game with a similarity-guided strategy")]
#[command(
    long_about = "Plays rounds of the link game: start on one article and reach the goal
article by following links, guided by semantic similarity to the goal.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Strategy to play with (greedy, biased, iddfs, mcts)
    #[arg(long, default_value_t = default_strategy())]
    pub strategy: String,

    /// Group code announced to the game server
    #[arg(long)]
    pub group_code: Option<String>,

    /// Number of games to play (0 for unlimited)
    #[arg(long, default_value_t = default_max_games())]
    pub max_games: u32,

    /// Abandon a round after this many consecutive idle ticks
    #[arg(long, default_value_t = default_max_idle_ticks())]
    pub max_idle_ticks: u32,

    /// World file (rounds and link graph) for the simulated game
    #[arg(long, default_value_t = default_world_path())]
    pub world_path: String,

    /// SQLite link graph used by IDDFS (falls back to the world graph)
    #[arg(long, default_value_t = default_graph_db_path())]
    pub graph_db_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Data directory for the stats file
    #[arg(long, default_value_t = default_data_dir())]
    pub data_dir: String,

    /// Embedding dimensions of the hashing embedder
    #[arg(long, default_value_t = default_dimensions())]
    pub dimensions: usize,

    /// Certainty multiplier applied each time the same goal is retried
    #[arg(long, default_value_t = default_certainty_decay())]
    pub certainty_decay: f64,

    /// Ranking reference of the biased strategy before the trigger topic
    #[arg(long, default_value_t = default_waypoint())]
    pub waypoint: String,

    /// Topic that switches the biased strategy to the real goal
    #[arg(long, default_value_t = default_trigger_topic())]
    pub trigger_topic: String,

    /// After the trigger, every Nth pick is uniformly random
    #[arg(long, default_value_t = default_random_interval())]
    pub random_interval: usize,

    /// Pause after a win for greedy and biased (milliseconds)
    #[arg(long, default_value_t = default_explore_win_pause_ms())]
    pub explore_win_pause_ms: u64,

    /// Links expanded per page by IDDFS
    #[arg(long, default_value_t = default_iddfs_max_breadth())]
    pub iddfs_max_breadth: usize,

    /// Largest IDDFS depth limit of the first solve
    #[arg(long, default_value_t = default_iddfs_max_depth())]
    pub iddfs_max_depth: usize,

    /// Links considered per page before ranking
    #[arg(long, default_value_t = default_max_pages())]
    pub max_pages: usize,

    /// Added to both IDDFS bounds after an exhausted solve
    #[arg(long, default_value_t = default_widen_step())]
    pub widen_step: usize,

    /// Children added per MCTS expansion
    #[arg(long, default_value_t = default_mcts_max_breadth())]
    pub mcts_max_breadth: usize,

    /// UCT exploration constant
    #[arg(long, default_value_t = default_exploration())]
    pub exploration: f64,

    /// Pause after a win for MCTS (milliseconds)
    #[arg(long, default_value_t = default_mcts_win_pause_ms())]
    pub mcts_win_pause_ms: u64,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.strategy_kind()?;

        if !(self.certainty_decay > 0.0 && self.certainty_decay < 1.0) {
            return Err(anyhow!(
                "certainty_decay must lie in (0, 1), got {}",
                self.certainty_decay
            ));
        }

        if self.random_interval == 0 {
            return Err(anyhow!("random_interval must be greater than 0"));
        }

        if self.iddfs_max_breadth == 0 || self.iddfs_max_depth == 0 {
            return Err(anyhow!("iddfs_max_breadth and iddfs_max_depth must be greater than 0"));
        }

        if self.mcts_max_breadth == 0 {
            return Err(anyhow!("mcts_max_breadth must be greater than 0"));
        }

        if self.max_idle_ticks == 0 {
            return Err(anyhow!("max_idle_ticks must be greater than 0"));
        }

        if self.world_path.is_empty() {
            return Err(anyhow!("world_path cannot be empty"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    pub fn strategy_kind(&self) -> Result<StrategyKind> {
        self.strategy.parse()
    }

    /// None when the number of games is unbounded.
    pub fn game_limit(&self) -> Option<u32> {
        (self.max_games > 0).then_some(self.max_games)
    }

    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            group_code: self.group_code.clone().or_else(|| CENTRAL_CONFIG.game.group_code.clone()),
            max_games: self.game_limit(),
            max_idle_ticks: self.max_idle_ticks,
            ..RunnerConfig::default()
        }
    }

    pub fn explore_config(&self) -> ExploreConfig {
        ExploreConfig::default()
            .with_certainty_decay(self.certainty_decay)
            .with_waypoint(&self.waypoint, &self.trigger_topic)
            .with_random_interval(self.random_interval)
            .with_win_pause(Duration::from_millis(self.explore_win_pause_ms))
    }

    pub fn iddfs_config(&self) -> IddfsConfig {
        IddfsConfig {
            max_breadth: self.iddfs_max_breadth,
            max_depth: self.iddfs_max_depth,
            max_pages: self.max_pages,
            widen_step: self.widen_step,
        }
    }

    pub fn mcts_config(&self) -> MctsConfig {
        MctsConfig::default()
            .with_max_breadth(self.mcts_max_breadth)
            .with_exploration(self.exploration as f32)
            .with_win_pause(Duration::from_millis(self.mcts_win_pause_ms))
    }

    /// Built-in values with no win pauses, independent of config.toml.
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            strategy: "greedy".into(),
            group_code: None,
            max_games: 1,
            max_idle_ticks: 50,
            world_path: "../data/world.json".into(),
            graph_db_path: "../data/graph.sqlite".into(),
            log_level: "info".into(),
            data_dir: "../data".into(),
            dimensions: 256,
            certainty_decay: 0.8,
            waypoint: "United States".into(),
            trigger_topic: "United_States_of_America".into(),
            random_interval: 7,
            explore_win_pause_ms: 0,
            iddfs_max_breadth: 6,
            iddfs_max_depth: 6,
            max_pages: 250,
            widen_step: 1,
            mcts_max_breadth: 3,
            exploration: std::f64::consts::SQRT_2,
            mcts_win_pause_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config::for_testing()
    }

    #[test]
    fn validate_accepts_valid_configuration() {
        let cfg = base_config();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_unknown_strategy() {
        let mut cfg = base_config();
        cfg.strategy = "random-walk".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("unknown strategy"));
    }

    #[test]
    fn validate_rejects_decay_out_of_range() {
        for decay in [0.0, 1.0, 1.5, -0.2] {
            let mut cfg = base_config();
            cfg.certainty_decay = decay;
            let err = cfg.validate().unwrap_err();
            assert!(err.to_string().contains("certainty_decay"));
        }
    }

    #[test]
    fn validate_rejects_zero_random_interval() {
        let mut cfg = base_config();
        cfg.random_interval = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("random_interval"));
    }

    #[test]
    fn validate_rejects_zero_bounds() {
        let mut cfg = base_config();
        cfg.iddfs_max_depth = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = base_config();
        cfg.mcts_max_breadth = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("mcts_max_breadth"));
    }

    #[test]
    fn validate_rejects_empty_world_path() {
        let mut cfg = base_config();
        cfg.world_path.clear();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("world_path"));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut cfg = base_config();
        cfg.log_level = "nope".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }

    #[test]
    fn strategy_kind_is_case_insensitive() {
        let mut cfg = base_config();
        cfg.strategy = "MCTS".into();
        assert_eq!(cfg.strategy_kind().unwrap(), StrategyKind::Mcts);
        assert_eq!(StrategyKind::Mcts.to_string(), "mcts");
    }

    #[test]
    fn zero_max_games_is_unlimited() {
        let mut cfg = base_config();
        assert_eq!(cfg.game_limit(), Some(1));
        cfg.max_games = 0;
        assert_eq!(cfg.game_limit(), None);
        assert_eq!(cfg.runner_config().max_games, None);
    }

    #[test]
    fn strategy_configs_carry_cli_values() {
        let mut cfg = base_config();
        cfg.explore_win_pause_ms = 3000;
        cfg.iddfs_max_depth = 4;
        cfg.exploration = 0.5;

        assert_eq!(cfg.explore_config().win_pause, Duration::from_secs(3));
        assert_eq!(cfg.iddfs_config().max_depth, 4);
        assert_eq!(cfg.mcts_config().exploration, 0.5);
        assert!(cfg.mcts_config().win_pause.is_zero());
    }
}
