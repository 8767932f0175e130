//! Page navigator interface.
//!
//! The navigator owns the live game session (browser, remote game server,
//! or a simulation). Strategies only read its state and issue `click` /
//! `go_back` commands; every command blocks until the navigator has observed
//! the resulting page or given up.

use thiserror::Error;

use crate::model::Link;

/// Fatal navigator failures. Transient failures never surface here:
/// a click that did not change the page is reported as `Ok(false)`.
#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("Navigator unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected navigator state: {0}")]
    Protocol(String),
}

/// Live game session as seen by a strategy.
pub trait PageNavigator {
    /// Establish a fresh round and resolve its start and goal topics.
    /// Safe to call repeatedly across rounds.
    fn start_new_game(
        &mut self,
        bot_name: Option<&str>,
        group_code: Option<&str>,
    ) -> Result<(), NavigatorError>;

    /// All article links on the current page, deduplicated by target.
    /// Empty while a page is still loading or once the game is over.
    fn discover_links(&mut self) -> Result<Vec<Link>, NavigatorError>;

    /// Follow `link`. Returns whether the current page actually changed.
    fn click(&mut self, link: &Link) -> Result<bool, NavigatorError>;

    /// Revert one navigation step. A no-op at the round's start or after
    /// the game is over.
    fn go_back(&mut self) -> Result<(), NavigatorError>;

    fn is_game_over(&self) -> bool;

    fn has_won(&self) -> bool;

    fn current_topic(&self) -> String;

    fn start_topic(&self) -> String;

    fn goal_topic(&self) -> String;
}
