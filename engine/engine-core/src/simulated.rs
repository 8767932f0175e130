//! Deterministic navigator over an in-memory link graph.
//!
//! `SimulatedNavigator` plays rounds of the link game without a browser:
//! each round starts on a start topic, every click moves along one edge of
//! the graph, and reaching the goal topic wins the round. It is used for
//! offline play from a world file and as the fake navigator in tests.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::graph_store::InMemoryGraphStore;
use crate::model::{GameOutcome, Link};
use crate::navigator::{NavigatorError, PageNavigator};

/// One (start, goal) pairing served by the simulated game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub start: String,
    pub goal: String,
}

impl Round {
    pub fn new(start: &str, goal: &str) -> Self {
        Self {
            start: start.to_string(),
            goal: goal.to_string(),
        }
    }
}

/// Link graph plus the rounds to play over it, as stored in a world file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    #[serde(default)]
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub pages: HashMap<String, Vec<String>>,
}

impl World {
    pub fn from_json(content: &str) -> Result<Self, NavigatorError> {
        serde_json::from_str(content)
            .map_err(|e| NavigatorError::Unavailable(format!("invalid world file: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self, NavigatorError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NavigatorError::Unavailable(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// The same graph exposed as an offline data store.
    pub fn graph_store(&self) -> InMemoryGraphStore {
        InMemoryGraphStore::from_adjacency(self.pages.clone())
    }
}

/// Navigator that simulates the game over a [`World`].
#[derive(Debug)]
pub struct SimulatedNavigator {
    pages: HashMap<String, Vec<String>>,
    rounds: Vec<Round>,
    next_round: usize,
    /// Topics visited this round; the last entry is the current page
    history: Vec<String>,
    start: String,
    goal: String,
    active: bool,
    won: bool,
    click_limit: Option<u32>,
    blocked: HashSet<String>,
    clicked: Vec<String>,
    backtracks: u32,
    last_bot_name: Option<String>,
}

impl SimulatedNavigator {
    pub fn new(world: World) -> Self {
        Self {
            pages: world.pages,
            rounds: world.rounds,
            next_round: 0,
            history: Vec::new(),
            start: String::new(),
            goal: String::new(),
            active: false,
            won: false,
            click_limit: None,
            blocked: HashSet::new(),
            clicked: Vec::new(),
            backtracks: 0,
            last_bot_name: None,
        }
    }

    /// Builder pattern: add a page and its outgoing links.
    pub fn with_page(mut self, title: &str, links: &[&str]) -> Self {
        self.pages.insert(
            title.to_string(),
            links.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    /// Builder pattern: queue a round.
    pub fn with_round(mut self, start: &str, goal: &str) -> Self {
        self.rounds.push(Round::new(start, goal));
        self
    }

    /// Builder pattern: end a round as lost after this many clicks.
    pub fn with_click_limit(mut self, limit: u32) -> Self {
        self.click_limit = Some(limit);
        self
    }

    /// Make clicks on `topic` fail as if the element never became clickable.
    pub fn block_topic(&mut self, topic: &str) {
        self.blocked.insert(topic.to_string());
    }

    pub fn unblock_topic(&mut self, topic: &str) {
        self.blocked.remove(topic);
    }

    /// Topics successfully clicked during the current round, in order.
    pub fn clicked(&self) -> &[String] {
        &self.clicked
    }

    /// Number of back navigations performed during the current round.
    pub fn backtracks(&self) -> u32 {
        self.backtracks
    }

    /// Topic chain from the round's start to the current page.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn last_bot_name(&self) -> Option<&str> {
        self.last_bot_name.as_deref()
    }

    pub fn outcome(&self) -> GameOutcome {
        GameOutcome {
            start: self.start.clone(),
            goal: self.goal.clone(),
            clicks: self.clicked.len() as u32,
            backtracks: self.backtracks,
            won: self.won,
        }
    }

    fn current(&self) -> Option<&String> {
        self.history.last()
    }

    fn links_of(&self, topic: &str) -> Vec<Link> {
        let mut seen = HashSet::new();
        self.pages
            .get(topic)
            .map(|links| {
                links
                    .iter()
                    .map(|t| Link::to_topic(t))
                    .filter(|link| link.is_article())
                    .filter(|link| seen.insert(link.topic().to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl PageNavigator for SimulatedNavigator {
    fn start_new_game(
        &mut self,
        bot_name: Option<&str>,
        _group_code: Option<&str>,
    ) -> Result<(), NavigatorError> {
        if self.rounds.is_empty() {
            return Err(NavigatorError::Unavailable(
                "no rounds configured".to_string(),
            ));
        }

        let round = self.rounds[self.next_round % self.rounds.len()].clone();
        self.next_round += 1;

        self.start = round.start.clone();
        self.goal = round.goal;
        self.history = vec![round.start];
        self.active = true;
        self.won = false;
        self.clicked.clear();
        self.backtracks = 0;
        self.last_bot_name = bot_name.map(str::to_string);

        info!(start = %self.start, goal = %self.goal, "Game started");
        Ok(())
    }

    fn discover_links(&mut self) -> Result<Vec<Link>, NavigatorError> {
        if self.is_game_over() {
            warn!("Game is over!");
            return Ok(Vec::new());
        }

        let links = match self.current() {
            Some(topic) => self.links_of(topic),
            None => Vec::new(),
        };
        debug!(count = links.len(), "Hyperlinks collected");
        Ok(links)
    }

    fn click(&mut self, link: &Link) -> Result<bool, NavigatorError> {
        if self.is_game_over() {
            warn!("Game is over!");
            return Ok(false);
        }

        let topic = link.topic().to_string();
        let reachable = self
            .current()
            .map(|current| self.links_of(current))
            .unwrap_or_default()
            .iter()
            .any(|l| l.topic() == topic);

        if !reachable || self.blocked.contains(&topic) {
            warn!(%topic, "Failed to click hyperlink");
            return Ok(false);
        }

        self.history.push(topic.clone());
        self.clicked.push(topic.clone());
        debug!(%topic, "Clicked hyperlink");

        if topic == self.goal {
            self.won = true;
            self.active = false;
        } else if let Some(limit) = self.click_limit {
            if self.clicked.len() as u32 >= limit {
                info!(limit, "Click limit reached, round lost");
                self.active = false;
            }
        }

        Ok(true)
    }

    fn go_back(&mut self) -> Result<(), NavigatorError> {
        if self.is_game_over() {
            warn!("Game is over!");
        } else if self.history.len() <= 1 {
            warn!("Already back at start!");
        } else {
            self.history.pop();
            self.backtracks += 1;
        }
        Ok(())
    }

    fn is_game_over(&self) -> bool {
        !self.active
    }

    fn has_won(&self) -> bool {
        self.won
    }

    fn current_topic(&self) -> String {
        self.current().cloned().unwrap_or_default()
    }

    fn start_topic(&self) -> String {
        self.start.clone()
    }

    fn goal_topic(&self) -> String {
        self.goal.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_world() -> SimulatedNavigator {
        SimulatedNavigator::new(World::default())
            .with_page("Start", &["B", "C", "File:Logo.png", "B"])
            .with_page("B", &["Goal"])
            .with_page("C", &[])
            .with_round("Start", "Goal")
    }

    #[test]
    fn test_game_over_before_first_round() {
        let nav = small_world();
        assert!(nav.is_game_over());
        assert!(!nav.has_won());
    }

    #[test]
    fn test_discover_filters_and_dedups() {
        let mut nav = small_world();
        nav.start_new_game(Some("Test_Bot"), None).unwrap();

        let topics: Vec<String> = nav
            .discover_links()
            .unwrap()
            .iter()
            .map(|l| l.topic().to_string())
            .collect();
        assert_eq!(topics, vec!["B", "C"]);
        assert_eq!(nav.last_bot_name(), Some("Test_Bot"));
    }

    #[test]
    fn test_click_to_goal_wins() {
        let mut nav = small_world();
        nav.start_new_game(None, None).unwrap();

        assert!(nav.click(&Link::to_topic("B")).unwrap());
        assert_eq!(nav.current_topic(), "B");
        assert!(nav.click(&Link::to_topic("Goal")).unwrap());

        assert!(nav.is_game_over());
        assert!(nav.has_won());
        assert_eq!(nav.outcome().clicks, 2);
    }

    #[test]
    fn test_click_unknown_or_blocked_link_fails() {
        let mut nav = small_world();
        nav.start_new_game(None, None).unwrap();

        assert!(!nav.click(&Link::to_topic("Goal")).unwrap());
        nav.block_topic("B");
        assert!(!nav.click(&Link::to_topic("B")).unwrap());
        assert_eq!(nav.current_topic(), "Start");

        nav.unblock_topic("B");
        assert!(nav.click(&Link::to_topic("B")).unwrap());
    }

    #[test]
    fn test_go_back_is_noop_at_start() {
        let mut nav = small_world();
        nav.start_new_game(None, None).unwrap();

        nav.go_back().unwrap();
        assert_eq!(nav.backtracks(), 0);

        nav.click(&Link::to_topic("C")).unwrap();
        nav.go_back().unwrap();
        assert_eq!(nav.current_topic(), "Start");
        assert_eq!(nav.backtracks(), 1);
    }

    #[test]
    fn test_click_limit_ends_round() {
        let mut nav = small_world().with_click_limit(1);
        nav.start_new_game(None, None).unwrap();

        nav.click(&Link::to_topic("C")).unwrap();
        assert!(nav.is_game_over());
        assert!(!nav.has_won());
        assert!(nav.discover_links().unwrap().is_empty());
    }

    #[test]
    fn test_rounds_cycle() {
        let mut nav = small_world().with_round("B", "Goal");
        nav.start_new_game(None, None).unwrap();
        assert_eq!(nav.start_topic(), "Start");
        nav.start_new_game(None, None).unwrap();
        assert_eq!(nav.start_topic(), "B");
        nav.start_new_game(None, None).unwrap();
        assert_eq!(nav.start_topic(), "Start");
    }

    #[test]
    fn test_no_rounds_is_unavailable() {
        let mut nav = SimulatedNavigator::new(World::default());
        assert!(nav.start_new_game(None, None).is_err());
    }

    #[test]
    fn test_world_from_json() {
        let world = World::from_json(
            r#"{"rounds": [{"start": "A", "goal": "B"}], "pages": {"A": ["B"]}}"#,
        )
        .unwrap();
        assert_eq!(world.rounds, vec![Round::new("A", "B")]);
        assert_eq!(world.graph_store().len(), 1);
    }
}
