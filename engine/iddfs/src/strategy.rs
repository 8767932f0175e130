//! Plan paths offline with IDDFS, then click them through live.

use std::sync::Arc;

use engine_core::{
    GraphDataStore, PageNavigator, StepOutcome, StopSignal, Strategy, StrategyError,
};
use similarity::SimilarityRanker;
use tracing::{debug, info, warn};

use crate::config::IddfsConfig;
use crate::planner::IddfsPlanner;

pub const IDDFS_BOT_NAME: &str = "Iddfs_Bot";

/// How walking one planned path through the live game ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Execution {
    /// Every step was clicked (or the game ended on the way)
    Completed,
    /// A step could not be taken; the navigator was walked back to the start
    Abandoned { step: String, backtracked: usize },
}

/// Iterative deepening strategy.
///
/// Each tick pulls the next solution from the planner and executes it. When
/// a solve runs dry both bounds widen by `widen_step` and the next tick
/// starts a fresh solve. Bounds and planner reset when the goal changes and
/// persist while the same goal is retried.
pub struct IddfsStrategy {
    ranker: SimilarityRanker,
    store: Arc<dyn GraphDataStore>,
    config: IddfsConfig,
    planner: Option<IddfsPlanner>,
    max_breadth: usize,
    max_depth: usize,
    solving: bool,
}

impl IddfsStrategy {
    pub fn new(
        ranker: SimilarityRanker,
        store: Arc<dyn GraphDataStore>,
        config: IddfsConfig,
    ) -> Self {
        Self {
            ranker,
            store,
            max_breadth: config.max_breadth,
            max_depth: config.max_depth,
            config,
            planner: None,
            solving: false,
        }
    }

    /// Current (breadth, depth) bounds.
    pub fn bounds(&self) -> (usize, usize) {
        (self.max_breadth, self.max_depth)
    }

    pub fn planner(&self) -> Option<&IddfsPlanner> {
        self.planner.as_ref()
    }

    /// Click through `solution[1..]`. On a missing link or failed click,
    /// go back once per step already taken and abandon the path.
    fn execute(
        planner: &mut IddfsPlanner,
        navigator: &mut dyn PageNavigator,
        solution: &[String],
    ) -> Result<Execution, StrategyError> {
        let mut links = navigator.discover_links()?;

        for (taken, step) in solution.iter().skip(1).enumerate() {
            if navigator.is_game_over() {
                break;
            }

            let clicked = match links.iter().find(|link| link.topic() == step.as_str()) {
                Some(link) => navigator.click(link)?,
                None => {
                    warn!(%step, "Link not found on live page");
                    false
                }
            };

            if !clicked {
                for _ in 0..taken {
                    navigator.go_back()?;
                }
                return Ok(Execution::Abandoned {
                    step: step.clone(),
                    backtracked: taken,
                });
            }

            debug!(%step, "Followed planned link");
            if navigator.is_game_over() {
                break;
            }
            links = navigator.discover_links()?;
            planner.fix_links(&navigator.current_topic(), &links)?;
        }

        Ok(Execution::Completed)
    }
}

impl Strategy for IddfsStrategy {
    fn name(&self) -> &'static str {
        "iddfs"
    }

    fn bot_name(&self) -> &str {
        IDDFS_BOT_NAME
    }

    fn begin_game(&mut self, navigator: &mut dyn PageNavigator) -> Result<(), StrategyError> {
        let start = navigator.start_topic();
        let goal = navigator.goal_topic();

        let same_goal = self
            .planner
            .as_ref()
            .is_some_and(|p| p.goal() == goal && p.start() == start);
        if !same_goal {
            info!(%start, %goal, "New goal, resetting planner");
            self.planner = Some(IddfsPlanner::new(
                &start,
                &goal,
                self.store.clone(),
                self.ranker.clone(),
                self.config.max_pages,
            ));
            self.max_breadth = self.config.max_breadth;
            self.max_depth = self.config.max_depth;
        }
        self.solving = false;

        if let Some(planner) = self.planner.as_mut() {
            let links = navigator.discover_links()?;
            planner.fix_links(&start, &links)?;
        }
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
        let Some(planner) = self.planner.as_mut() else {
            return Ok(StepOutcome::Idle);
        };

        if !self.solving {
            planner.restart(self.max_breadth, self.max_depth);
            self.solving = true;
        }

        match planner.next_solution(stop)? {
            Some(solution) => {
                info!(?solution, "Solution");
                match Self::execute(planner, navigator, &solution)? {
                    Execution::Completed => {}
                    Execution::Abandoned { step, backtracked } => {
                        info!(%step, backtracked, "Plan abandoned");
                    }
                }
                Ok(StepOutcome::Advanced)
            }
            None if stop.is_raised() => Ok(StepOutcome::Stopped),
            None => {
                self.max_breadth += self.config.widen_step;
                self.max_depth += self.config.widen_step;
                self.solving = false;
                info!(
                    max_breadth = self.max_breadth,
                    max_depth = self.max_depth,
                    "Solve exhausted, widening bounds"
                );
                Ok(StepOutcome::Idle)
            }
        }
    }
}
