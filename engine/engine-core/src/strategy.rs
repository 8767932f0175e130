//! The contract every search strategy implements.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use similarity::RankError;
use thiserror::Error;

use crate::graph_store::GraphStoreError;
use crate::model::GameOutcome;
use crate::navigator::{NavigatorError, PageNavigator};

/// Errors a strategy cannot recover from locally. All of them mean a
/// collaborator (navigator, embedding model, graph store) is unusable.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Navigator error: {0}")]
    Navigator(#[from] NavigatorError),

    #[error("Ranking error: {0}")]
    Ranking(#[from] RankError),

    #[error("Graph store error: {0}")]
    GraphStore(#[from] GraphStoreError),
}

/// What a single strategy tick accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing to do this tick (no links discovered yet)
    Idle,
    /// At least one navigator command was issued
    Advanced,
    /// The tick noticed the stop signal and returned early
    Stopped,
}

/// Shared flag asking the game loop to exit.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A policy that decides which link to follow next.
///
/// The [`GameRunner`](crate::runner::GameRunner) calls `begin_game` once a
/// new round has a start and goal, `step` until the navigator reports game
/// over, then `end_game`. Strategies keep whatever memory they need across
/// rounds (for example to notice the same goal being retried).
pub trait Strategy {
    /// Short identifier used in logs and on the command line.
    fn name(&self) -> &'static str;

    /// Name announced to the game server.
    fn bot_name(&self) -> &str;

    fn begin_game(&mut self, navigator: &mut dyn PageNavigator) -> Result<(), StrategyError>;

    fn step(
        &mut self,
        navigator: &mut dyn PageNavigator,
        stop: &StopSignal,
    ) -> Result<StepOutcome, StrategyError>;

    fn end_game(&mut self, _outcome: &GameOutcome) {}
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn bot_name(&self) -> &str {
        (**self).bot_name()
    }

    fn begin_game(&mut self, navigator: &mut dyn PageNavigator) -> Result<(), StrategyError> {
        (**self).begin_game(navigator)
    }

    fn step(
        &mut self,
        navigator: &mut dyn PageNavigator,
        stop: &StopSignal,
    ) -> Result<StepOutcome, StrategyError> {
        (**self).step(navigator, stop)
    }

    fn end_game(&mut self, outcome: &GameOutcome) {
        (**self).end_game(outcome)
    }
}
