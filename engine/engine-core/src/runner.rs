//! Game loop state machine.
//!
//! `GameRunner` owns one navigator and one strategy and moves through
//! `AwaitingGame → Exploring → GameOver → AwaitingGame …` until the stop
//! signal is raised or the configured number of games has been played.
//! Each call to [`GameRunner::tick`] performs exactly one transition or one
//! strategy step, so the loop can be unit tested without real iteration.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::model::{GameOutcome, Link};
use crate::navigator::{NavigatorError, PageNavigator};
use crate::strategy::{StepOutcome, StopSignal, Strategy, StrategyError};

/// Where the runner is in the game lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingGame,
    Exploring,
    GameOver,
    Stopped,
}

/// Configuration for [`GameRunner`].
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Group code forwarded to the game server
    pub group_code: Option<String>,
    /// Stop after this many games (None for unlimited)
    pub max_games: Option<u32>,
    /// Abandon a round after this many consecutive idle ticks
    pub max_idle_ticks: u32,
    /// Pause between idle ticks
    pub idle_backoff: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            group_code: None,
            max_games: None,
            max_idle_ticks: 50,
            idle_backoff: Duration::from_millis(100),
        }
    }
}

impl RunnerConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            group_code: None,
            max_games: Some(1),
            max_idle_ticks: 3,
            idle_backoff: Duration::ZERO,
        }
    }

    /// Builder pattern: set the game limit.
    pub fn with_max_games(mut self, games: u32) -> Self {
        self.max_games = Some(games);
        self
    }

    /// Builder pattern: set the group code.
    pub fn with_group_code(mut self, code: Option<String>) -> Self {
        self.group_code = code;
        self
    }
}

/// Drives a strategy against a navigator, one game after another.
pub struct GameRunner<S: Strategy, N: PageNavigator> {
    strategy: S,
    navigator: N,
    config: RunnerConfig,
    stop: StopSignal,
    state: SessionState,
    current: GameOutcome,
    idle_ticks: u32,
    outcomes: Vec<GameOutcome>,
}

impl<S: Strategy, N: PageNavigator> GameRunner<S, N> {
    pub fn new(strategy: S, navigator: N, config: RunnerConfig, stop: StopSignal) -> Self {
        Self {
            strategy,
            navigator,
            config,
            stop,
            state: SessionState::AwaitingGame,
            current: GameOutcome::default(),
            idle_ticks: 0,
            outcomes: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Outcomes of every finished game, oldest first.
    pub fn outcomes(&self) -> &[GameOutcome] {
        &self.outcomes
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Tick until the runner stops. Returns the number of games played.
    pub fn run(&mut self) -> Result<usize, StrategyError> {
        info!(strategy = self.strategy.name(), "Runner starting");
        while self.tick()? != SessionState::Stopped {}
        info!(games = self.outcomes.len(), "Runner stopped");
        Ok(self.outcomes.len())
    }

    /// Perform one transition or one strategy step.
    pub fn tick(&mut self) -> Result<SessionState, StrategyError> {
        self.state = match self.state {
            SessionState::AwaitingGame => self.await_game()?,
            SessionState::Exploring => self.explore()?,
            SessionState::GameOver => self.finish_game(),
            SessionState::Stopped => SessionState::Stopped,
        };
        Ok(self.state)
    }

    fn await_game(&mut self) -> Result<SessionState, StrategyError> {
        if self.stop.is_raised() {
            return Ok(SessionState::Stopped);
        }
        if let Some(max) = self.config.max_games {
            if self.outcomes.len() as u32 >= max {
                info!(max_games = max, "Reached maximum games, stopping");
                return Ok(SessionState::Stopped);
            }
        }

        info!("Starting game...");
        self.navigator.start_new_game(
            Some(self.strategy.bot_name()),
            self.config.group_code.as_deref(),
        )?;

        self.current = GameOutcome {
            start: self.navigator.start_topic(),
            goal: self.navigator.goal_topic(),
            ..GameOutcome::default()
        };
        self.idle_ticks = 0;
        info!(start = %self.current.start, goal = %self.current.goal, "Game resolved");

        let mut counting = CountingNavigator::new(&mut self.navigator, &mut self.current);
        self.strategy.begin_game(&mut counting)?;
        Ok(SessionState::Exploring)
    }

    fn explore(&mut self) -> Result<SessionState, StrategyError> {
        if self.stop.is_raised() {
            return Ok(SessionState::Stopped);
        }
        if self.navigator.is_game_over() {
            return Ok(SessionState::GameOver);
        }

        let mut counting = CountingNavigator::new(&mut self.navigator, &mut self.current);
        match self.strategy.step(&mut counting, &self.stop)? {
            StepOutcome::Advanced => self.idle_ticks = 0,
            StepOutcome::Stopped => return Ok(SessionState::Stopped),
            StepOutcome::Idle => {
                self.idle_ticks += 1;
                debug!(idle_ticks = self.idle_ticks, "Strategy idle");
                if self.idle_ticks >= self.config.max_idle_ticks {
                    warn!(
                        idle_ticks = self.idle_ticks,
                        topic = %self.navigator.current_topic(),
                        "No progress possible, abandoning round"
                    );
                    return Ok(SessionState::GameOver);
                }
                if !self.config.idle_backoff.is_zero() {
                    std::thread::sleep(self.config.idle_backoff);
                }
            }
        }

        Ok(SessionState::Exploring)
    }

    fn finish_game(&mut self) -> SessionState {
        self.current.won = self.navigator.has_won();
        let outcome = std::mem::take(&mut self.current);
        info!(
            start = %outcome.start,
            goal = %outcome.goal,
            clicks = outcome.clicks,
            backtracks = outcome.backtracks,
            won = outcome.won,
            "Game over"
        );
        self.strategy.end_game(&outcome);
        self.outcomes.push(outcome);
        SessionState::AwaitingGame
    }
}

/// Navigator wrapper that tallies successful clicks and back navigations
/// into the running game's outcome.
struct CountingNavigator<'a> {
    inner: &'a mut dyn PageNavigator,
    outcome: &'a mut GameOutcome,
}

impl<'a> CountingNavigator<'a> {
    fn new(inner: &'a mut dyn PageNavigator, outcome: &'a mut GameOutcome) -> Self {
        Self { inner, outcome }
    }
}

impl PageNavigator for CountingNavigator<'_> {
    fn start_new_game(
        &mut self,
        bot_name: Option<&str>,
        group_code: Option<&str>,
    ) -> Result<(), NavigatorError> {
        self.inner.start_new_game(bot_name, group_code)
    }

    fn discover_links(&mut self) -> Result<Vec<Link>, NavigatorError> {
        self.inner.discover_links()
    }

    fn click(&mut self, link: &Link) -> Result<bool, NavigatorError> {
        let changed = self.inner.click(link)?;
        if changed {
            self.outcome.clicks += 1;
        }
        Ok(changed)
    }

    fn go_back(&mut self) -> Result<(), NavigatorError> {
        let before = self.inner.current_topic();
        self.inner.go_back()?;
        if self.inner.current_topic() != before {
            self.outcome.backtracks += 1;
        }
        Ok(())
    }

    fn is_game_over(&self) -> bool {
        self.inner.is_game_over()
    }

    fn has_won(&self) -> bool {
        self.inner.has_won()
    }

    fn current_topic(&self) -> String {
        self.inner.current_topic()
    }

    fn start_topic(&self) -> String {
        self.inner.start_topic()
    }

    fn goal_topic(&self) -> String {
        self.inner.goal_topic()
    }
}
