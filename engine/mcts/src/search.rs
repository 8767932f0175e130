//! MCTS played directly against the live navigator.
//!
//! Descending the tree means clicking real links and ascending it means
//! real back navigations, so the navigator's page always matches the
//! strategy's current node. Each [`Strategy::step`] performs one unit of
//! work: a single selection click, or one expansion followed by the
//! backpropagation walk to the root.

use std::collections::HashSet;
use std::thread;

use engine_core::{
    topic_title, Link, PageNavigator, StepOutcome, StopSignal, Strategy, StrategyError,
};
use similarity::SimilarityRanker;
use tracing::{debug, info, trace, warn};

use crate::config::MctsConfig;
use crate::node::NodeId;
use crate::tree::SearchTree;

pub const MCTS_BOT_NAME: &str = "Mcts_Bot";

/// Live Monte Carlo tree search strategy.
pub struct MctsStrategy {
    ranker: SimilarityRanker,
    config: MctsConfig,
    tree: SearchTree,
    current: NodeId,
    /// (start, goal) the tree was built for
    round: Option<(String, String)>,
}

impl MctsStrategy {
    pub fn new(ranker: SimilarityRanker, config: MctsConfig) -> Self {
        let tree = SearchTree::new();
        Self {
            ranker,
            config,
            current: tree.root(),
            tree,
            round: None,
        }
    }

    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    /// Node matching the navigator's current page.
    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Walk the navigator back to the start page and reset the cursor to
    /// the root without touching any statistics.
    fn return_to_root(&mut self, navigator: &mut dyn PageNavigator) -> Result<(), StrategyError> {
        for _ in 0..self.tree.get(self.current).depth {
            navigator.go_back()?;
        }
        self.current = self.tree.root();
        Ok(())
    }

    fn select(&mut self, navigator: &mut dyn PageNavigator) -> Result<StepOutcome, StrategyError> {
        let Some(child) = self.tree.select_child(self.current, self.config.exploration) else {
            if self.current == self.tree.root() {
                warn!("Every link from the start page failed, retrying all of them");
                self.tree.clear_unreachable(self.current);
                return Ok(StepOutcome::Idle);
            }
            // Retry the failed links later; score this node as a dead end meanwhile
            debug!(topic = %navigator.current_topic(), "No reachable children, backing off");
            self.tree.clear_unreachable(self.current);
            self.tree.backpropagate(self.current, 0.0, || navigator.go_back())?;
            self.current = self.tree.root();
            return Ok(StepOutcome::Advanced);
        };

        let Some(link) = self.tree.get(child).link.clone() else {
            return Ok(StepOutcome::Idle);
        };
        if !navigator.click(&link)? {
            warn!(topic = %link.topic(), "Click failed, marking link unreachable");
            self.tree.get_mut(child).unreachable = true;
            self.return_to_root(navigator)?;
            return Ok(StepOutcome::Advanced);
        }

        debug!(topic = %link.topic(), depth = self.tree.get(child).depth, "Selected");
        self.current = child;

        if navigator.has_won() {
            info!(goal = %navigator.goal_topic(), "WIN");
            if !self.config.win_pause.is_zero() {
                thread::sleep(self.config.win_pause);
            }
        }
        Ok(StepOutcome::Advanced)
    }

    /// Add the top ranked links as children of the current node and return
    /// the rollout score (the best child's similarity, 0.0 without links).
    fn expand(&mut self, links: &[Link], goal: &str) -> Result<f32, StrategyError> {
        let mut seen = HashSet::new();
        let candidates: Vec<&Link> = links.iter().filter(|l| seen.insert(l.label())).collect();
        let labels: Vec<String> = candidates.iter().map(|l| l.label().to_string()).collect();

        let ranked = self.ranker.rank(&labels, &topic_title(goal))?;
        for (label, score) in ranked.iter().take(self.config.max_breadth) {
            if let Some(link) = candidates.iter().find(|l| l.label() == label.as_str()) {
                self.tree.add_child(self.current, (*link).clone(), *score);
            }
        }

        Ok(ranked.first().map(|(_, score)| *score).unwrap_or(0.0))
    }

    fn expand_and_backpropagate(
        &mut self,
        navigator: &mut dyn PageNavigator,
    ) -> Result<StepOutcome, StrategyError> {
        let links = navigator.discover_links()?;
        if links.is_empty() && self.current == self.tree.root() {
            return Ok(StepOutcome::Idle);
        }

        let rollout = self.expand(&links, &navigator.goal_topic())?;
        debug!(
            topic = %navigator.current_topic(),
            children = self.tree.get(self.current).children.len(),
            rollout,
            "Expanded"
        );

        self.tree
            .backpropagate(self.current, rollout, || navigator.go_back())?;
        self.current = self.tree.root();

        let stats = self.tree.stats();
        debug!(
            nodes = stats.total_nodes,
            root_visits = stats.root_visits,
            max_depth = stats.max_depth,
            "Iteration complete"
        );
        trace!("\n{}", self.tree);
        Ok(StepOutcome::Advanced)
    }
}

impl Strategy for MctsStrategy {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn bot_name(&self) -> &str {
        MCTS_BOT_NAME
    }

    fn begin_game(&mut self, navigator: &mut dyn PageNavigator) -> Result<(), StrategyError> {
        let round = (navigator.start_topic(), navigator.goal_topic());
        if self.round.as_ref() != Some(&round) {
            info!(start = %round.0, goal = %round.1, "New goal, resetting tree");
            self.tree = SearchTree::new();
            self.round = Some(round);
        }
        self.current = self.tree.root();
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

        if self.tree.get(self.current).is_expanded() {
            self.select(navigator)
        } else {
            self.expand_and_backpropagate(navigator)
        }
    }
}
