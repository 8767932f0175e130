//! Per-tick link choice shared by the greedy and biased strategies.

use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use engine_core::{PageNavigator, StepOutcome, StrategyError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use similarity::SimilarityRanker;
use tracing::{debug, info, warn};

use crate::certainty::CertaintyTracker;

/// How the next candidate is picked from a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    /// Certainty-weighted walk down the ranking, skipping visited labels
    Weighted,
    /// Uniformly random entry of the full ranking
    Uniform,
}

/// Walk `ranked` best-first and accept the first unvisited candidate whose
/// draw is at most `certainty`. Falls back to the top entry.
pub fn choose_weighted<'a, R: Rng + ?Sized>(
    ranked: &'a [(String, f32)],
    visited: &HashSet<String>,
    certainty: f64,
    rng: &mut R,
) -> Option<&'a str> {
    let top = ranked.first()?;
    let choice = ranked
        .iter()
        .filter(|(label, _)| !visited.contains(label))
        .find(|_| rng.gen::<f64>() <= certainty)
        .unwrap_or(top);
    Some(choice.0.as_str())
}

/// Any entry of `ranked`, uniformly.
pub fn choose_uniform<'a, R: Rng + ?Sized>(
    ranked: &'a [(String, f32)],
    rng: &mut R,
) -> Option<&'a str> {
    if ranked.is_empty() {
        return None;
    }
    Some(ranked[rng.gen_range(0..ranked.len())].0.as_str())
}

/// Ranking, visited-set and certainty state for one exploring bot.
pub struct Explorer {
    ranker: SimilarityRanker,
    certainty: CertaintyTracker,
    visited: HashSet<String>,
    rng: ChaCha20Rng,
    win_pause: Duration,
}

impl Explorer {
    pub fn new(ranker: SimilarityRanker, decay: f64, win_pause: Duration) -> Self {
        Self {
            ranker,
            certainty: CertaintyTracker::new(decay),
            visited: HashSet::new(),
            rng: ChaCha20Rng::from_entropy(),
            win_pause,
        }
    }

    /// Replace the entropy-seeded RNG with a deterministic one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
        self
    }

    /// Reset per-round state for a round with `goal`.
    pub fn begin_round(&mut self, goal: &str) -> f64 {
        self.visited.clear();
        let certainty = self.certainty.observe(goal);
        info!(%goal, certainty, "Round begins");
        certainty
    }

    pub fn certainty(&self) -> f64 {
        self.certainty.certainty()
    }

    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Rank the current links against `reference`, pick one, click it.
    pub fn advance(
        &mut self,
        navigator: &mut dyn PageNavigator,
        reference: &str,
        pick: Pick,
    ) -> Result<StepOutcome, StrategyError> {
        let links = navigator.discover_links()?;
        if links.is_empty() {
            return Ok(StepOutcome::Idle);
        }

        let labels: Vec<String> = links.iter().map(|l| l.label().to_string()).collect();
        let ranked = self.ranker.rank(&labels, reference)?;
        for (label, score) in ranked.iter().take(10) {
            debug!(%label, score, %reference, "Top candidate");
        }

        let certainty = self.certainty.certainty();
        let choice = match pick {
            Pick::Weighted => choose_weighted(&ranked, &self.visited, certainty, &mut self.rng),
            Pick::Uniform => choose_uniform(&ranked, &mut self.rng),
        };
        let Some(choice) = choice.map(str::to_string) else {
            return Ok(StepOutcome::Idle);
        };

        info!(%choice, certainty, ?pick, "Chosen candidate");
        self.visited.insert(choice.clone());

        let Some(link) = links.iter().find(|l| l.label() == choice) else {
            return Ok(StepOutcome::Idle);
        };
        if !navigator.click(link)? {
            warn!(topic = %link.topic(), "Click failed, moving on");
            return Ok(StepOutcome::Idle);
        }

        if navigator.has_won() {
            info!(goal = %navigator.goal_topic(), "WIN");
            if !self.win_pause.is_zero() {
                thread::sleep(self.win_pause);
            }
        }
        Ok(StepOutcome::Advanced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking(labels: &[&str]) -> Vec<(String, f32)> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.to_string(), 1.0 - i as f32 * 0.1))
            .collect()
    }

    #[test]
    fn test_full_certainty_takes_best_unvisited() {
        let ranked = ranking(&["France", "Paris", "Dog"]);
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let visited = HashSet::new();
        assert_eq!(choose_weighted(&ranked, &visited, 1.0, &mut rng), Some("France"));

        let visited: HashSet<String> = ["France".to_string()].into_iter().collect();
        assert_eq!(choose_weighted(&ranked, &visited, 1.0, &mut rng), Some("Paris"));
    }

    #[test]
    fn test_all_visited_falls_back_to_top() {
        let ranked = ranking(&["A", "B"]);
        let visited: HashSet<String> = ["A", "B"].iter().map(|s| s.to_string()).collect();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert_eq!(choose_weighted(&ranked, &visited, 1.0, &mut rng), Some("A"));
    }

    #[test]
    fn test_low_certainty_explores_lower_ranks() {
        let ranked = ranking(&["A", "B", "C", "D", "E", "F"]);
        let visited = HashSet::new();
        let mut rng = ChaCha20Rng::seed_from_u64(7);

        let non_top = (0..200)
            .filter_map(|_| choose_weighted(&ranked, &visited, 0.3, &mut rng))
            .filter(|c| *c != "A")
            .count();
        assert!(non_top > 50);
    }

    #[test]
    fn test_empty_ranking_has_no_choice() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert_eq!(choose_weighted(&[], &HashSet::new(), 1.0, &mut rng), None);
        assert_eq!(choose_uniform(&[], &mut rng), None);
    }

    #[test]
    fn test_uniform_covers_ranking() {
        let ranked = ranking(&["A", "B", "C"]);
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let seen: HashSet<&str> = (0..100)
            .filter_map(|_| choose_uniform(&ranked, &mut rng))
            .collect();
        assert_eq!(seen.len(), 3);
    }
}
