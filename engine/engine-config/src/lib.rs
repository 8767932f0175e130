//! Centralized configuration loading from config.toml.
//!
//! Every setting has a built-in default (embedded from
//! `config.defaults.toml`), may be overridden by a `config.toml`, and finally
//! by an environment variable:
//!
//! ```text
//! WIKIGAME_<SECTION>_<KEY>=value
//!
//! Examples:
//!     WIKIGAME_GAME_STRATEGY=mcts
//!     WIKIGAME_GAME_GROUP_CODE=lab-42
//!     WIKIGAME_EXPLORE_CERTAINTY_DECAY=0.9
//!     WIKIGAME_IDDFS_MAX_DEPTH=4
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, CONFIG_ENV_VAR, CONFIG_SEARCH_PATHS,
};
pub use structs::*;
