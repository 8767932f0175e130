//! Exploration strategy parameters.

use std::time::Duration;

/// Configuration shared by the greedy and biased exploration strategies.
#[derive(Debug, Clone)]
pub struct ExploreConfig {
    /// Multiplier applied to certainty each time the same goal is retried.
    /// Must lie in (0, 1).
    pub certainty_decay: f64,

    /// Cosmetic pause after a win before the next round starts.
    pub win_pause: Duration,

    /// Ranking reference for the biased strategy until the trigger fires.
    pub waypoint: String,

    /// Topic whose visit switches the biased strategy to the real goal.
    pub trigger_topic: String,

    /// After the trigger, every pick made when `visited` is a multiple of
    /// this is uniformly random.
    pub random_interval: usize,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            certainty_decay: 0.8,
            win_pause: Duration::from_secs(3),
            waypoint: "United States".to_string(),
            trigger_topic: "United_States_of_America".to_string(),
            random_interval: 7,
        }
    }
}

impl ExploreConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            win_pause: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Builder pattern: set certainty decay.
    pub fn with_certainty_decay(mut self, decay: f64) -> Self {
        self.certainty_decay = decay;
        self
    }

    /// Builder pattern: set waypoint and trigger topic.
    pub fn with_waypoint(mut self, waypoint: &str, trigger_topic: &str) -> Self {
        self.waypoint = waypoint.to_string();
        self.trigger_topic = trigger_topic.to_string();
        self
    }

    /// Builder pattern: set random pick interval.
    pub fn with_random_interval(mut self, interval: usize) -> Self {
        self.random_interval = interval;
        self
    }

    /// Builder pattern: set win pause.
    pub fn with_win_pause(mut self, pause: Duration) -> Self {
        self.win_pause = pause;
        self
    }
}
