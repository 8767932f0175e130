//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Env var naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "WIKIGAME_CONFIG";

/// Standard locations to search for config.toml, in order
pub const CONFIG_SEARCH_PATHS: &[&str] = &["config.toml", "../config.toml", "/app/config.toml"];

/// Load the central configuration.
///
/// The first existing file wins: `$WIKIGAME_CONFIG`, then each entry of
/// [`CONFIG_SEARCH_PATHS`]. With no file the embedded defaults are used.
/// `WIKIGAME_<SECTION>_<KEY>` overrides are applied last in every case.
pub fn load_config() -> CentralConfig {
    let explicit = std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from);
    if let Some(path) = &explicit {
        if !path.exists() {
            warn!(path = %path.display(), "{} not found, searching defaults", CONFIG_ENV_VAR);
        }
    }

    let found = explicit
        .into_iter()
        .chain(CONFIG_SEARCH_PATHS.iter().map(PathBuf::from))
        .find(|path| path.exists());

    match found {
        Some(path) => {
            info!(path = %path.display(), "Loading config");
            load_from_path(&path)
        }
        None => {
            debug!("No config.toml found, using built-in defaults");
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read config, using defaults");
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, usize, f64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
    // Optional string field (empty clears it)
    ($config:expr, $section:ident . $field:ident, $key:expr, optional) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = if v.is_empty() { None } else { Some(v) };
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: WIKIGAME_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.data_dir, "WIKIGAME_COMMON_DATA_DIR");
    env_override!(config, common.log_level, "WIKIGAME_COMMON_LOG_LEVEL");

    // Game
    env_override!(config, game.strategy, "WIKIGAME_GAME_STRATEGY");
    env_override!(config, game.group_code, "WIKIGAME_GAME_GROUP_CODE", optional);
    env_override!(config, game.max_games, "WIKIGAME_GAME_MAX_GAMES", parse);
    env_override!(
        config,
        game.max_idle_ticks,
        "WIKIGAME_GAME_MAX_IDLE_TICKS",
        parse
    );
    env_override!(config, game.world_path, "WIKIGAME_GAME_WORLD_PATH");
    env_override!(config, game.graph_db_path, "WIKIGAME_GAME_GRAPH_DB_PATH");

    // Similarity
    env_override!(
        config,
        similarity.dimensions,
        "WIKIGAME_SIMILARITY_DIMENSIONS",
        parse
    );

    // Explore
    env_override!(
        config,
        explore.certainty_decay,
        "WIKIGAME_EXPLORE_CERTAINTY_DECAY",
        parse
    );
    env_override!(config, explore.waypoint, "WIKIGAME_EXPLORE_WAYPOINT");
    env_override!(
        config,
        explore.trigger_topic,
        "WIKIGAME_EXPLORE_TRIGGER_TOPIC"
    );
    env_override!(
        config,
        explore.random_interval,
        "WIKIGAME_EXPLORE_RANDOM_INTERVAL",
        parse
    );
    env_override!(
        config,
        explore.win_pause_ms,
        "WIKIGAME_EXPLORE_WIN_PAUSE_MS",
        parse
    );

    // IDDFS
    env_override!(
        config,
        iddfs.max_breadth,
        "WIKIGAME_IDDFS_MAX_BREADTH",
        parse
    );
    env_override!(config, iddfs.max_depth, "WIKIGAME_IDDFS_MAX_DEPTH", parse);
    env_override!(config, iddfs.max_pages, "WIKIGAME_IDDFS_MAX_PAGES", parse);
    env_override!(config, iddfs.widen_step, "WIKIGAME_IDDFS_WIDEN_STEP", parse);

    // MCTS
    env_override!(config, mcts.max_breadth, "WIKIGAME_MCTS_MAX_BREADTH", parse);
    env_override!(config, mcts.exploration, "WIKIGAME_MCTS_EXPLORATION", parse);
    env_override!(
        config,
        mcts.win_pause_ms,
        "WIKIGAME_MCTS_WIN_PAUSE_MS",
        parse
    );

    config
}
