//! Biased exploration: head for a waypoint first, then the goal.

use engine_core::{topic_title, PageNavigator, StepOutcome, StopSignal, Strategy, StrategyError};
use similarity::SimilarityRanker;
use tracing::info;

use crate::config::ExploreConfig;
use crate::explorer::{Explorer, Pick};

pub const BIASED_BOT_NAME: &str = "America_First_Bot";

/// Greedy exploration with two twists: links are ranked against a fixed
/// waypoint until the trigger topic is reached, and after that every
/// `random_interval`-th pick is uniformly random.
///
/// The trigger latches for the rest of the round and resets when a new
/// round begins.
pub struct BiasedStrategy {
    explorer: Explorer,
    waypoint: String,
    trigger_topic: String,
    random_interval: usize,
    triggered: bool,
}

impl BiasedStrategy {
    pub fn new(ranker: SimilarityRanker, config: &ExploreConfig) -> Self {
        Self {
            explorer: Explorer::new(ranker, config.certainty_decay, config.win_pause),
            waypoint: config.waypoint.clone(),
            trigger_topic: config.trigger_topic.clone(),
            random_interval: config.random_interval.max(1),
            triggered: false,
        }
    }

    /// Builder pattern: seed the RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.explorer = self.explorer.with_seed(seed);
        self
    }

    pub fn explorer(&self) -> &Explorer {
        &self.explorer
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }
}

impl Strategy for BiasedStrategy {
    fn name(&self) -> &'static str {
        "biased"
    }

    fn bot_name(&self) -> &str {
        BIASED_BOT_NAME
    }

    fn begin_game(&mut self, navigator: &mut dyn PageNavigator) -> Result<(), StrategyError> {
        self.triggered = false;
        self.explorer.begin_round(&navigator.goal_topic());
        Ok(())
    }

    fn step(
        &mut self,
        navigator: &mut dyn PageNavigator,
        stop: &StopSignal,
    ) -> Result<StepOutcome, StrategyError> {
        if stop.is_raised() {
            return Ok(StepOutcome::Stopped);
        }

        if !self.triggered && navigator.current_topic() == self.trigger_topic {
            self.triggered = true;
            info!(topic = %self.trigger_topic, "Waypoint reached, ranking against goal");
        }

        let (reference, pick) = if self.triggered {
            let pick = if self.explorer.visited().len() % self.random_interval == 0 {
                Pick::Uniform
            } else {
                Pick::Weighted
            };
            (topic_title(&navigator.goal_topic()), pick)
        } else {
            (self.waypoint.clone(), Pick::Weighted)
        };

        self.explorer.advance(navigator, &reference, pick)
    }
}
