//! MCTS configuration parameters.

use std::time::Duration;

/// Configuration for the live Monte Carlo tree search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Children added per expansion, taken from the top of the ranking.
    pub max_breadth: usize,

    /// Exploration constant in the UCT formula.
    /// Higher values favor rarely visited links, lower values favor
    /// links with a high mean similarity.
    pub exploration: f32,

    /// Pause after a win so the result stays on screen.
    pub win_pause: Duration,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            max_breadth: 3,
            exploration: std::f32::consts::SQRT_2,
            win_pause: Duration::from_secs(1),
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            win_pause: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Builder pattern: set max breadth.
    pub fn with_max_breadth(mut self, breadth: usize) -> Self {
        self.max_breadth = breadth.max(1);
        self
    }

    /// Builder pattern: set exploration constant.
    pub fn with_exploration(mut self, exploration: f32) -> Self {
        self.exploration = exploration;
        self
    }

    /// Builder pattern: set win pause.
    pub fn with_win_pause(mut self, pause: Duration) -> Self {
        self.win_pause = pause;
        self
    }
}
