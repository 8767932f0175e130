//! Greedy exploration: always rank against the goal.

use engine_core::{topic_title, PageNavigator, StepOutcome, StopSignal, Strategy, StrategyError};
use similarity::SimilarityRanker;

use crate::config::ExploreConfig;
use crate::explorer::{Explorer, Pick};

pub const GREEDY_BOT_NAME: &str = "Depth_First_Bot";

/// Ranks the current page's links by similarity to the goal and follows the
/// best unvisited one, accepting lower-ranked links more often as certainty
/// decays over retries of the same goal.
pub struct GreedyStrategy {
    explorer: Explorer,
}

impl GreedyStrategy {
    pub fn new(ranker: SimilarityRanker, config: &ExploreConfig) -> Self {
        Self {
            explorer: Explorer::new(ranker, config.certainty_decay, config.win_pause),
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
}

impl Strategy for GreedyStrategy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn bot_name(&self) -> &str {
        GREEDY_BOT_NAME
    }

    fn begin_game(&mut self, navigator: &mut dyn PageNavigator) -> Result<(), StrategyError> {
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
        let goal = topic_title(&navigator.goal_topic());
        self.explorer.advance(navigator, &goal, Pick::Weighted)
    }
}
