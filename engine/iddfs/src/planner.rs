//! Resumable iterative deepening search over the offline link graph.
//!
//! The planner is a cursor: [`IddfsPlanner::next_solution`] runs the
//! depth-limited DFS until it finds one new path to the goal and returns it,
//! leaving the explicit DFS stack in place so the next call resumes exactly
//! where the previous one stopped. Between calls the caller is free to click
//! through the returned path and correct the page cache with `fix_links`.
//!
//! Depth limits run `1..=max_depth`; a limit of `d` reports paths of at most
//! `d` clicks. Each pass keeps a title → depth map and prunes a page already
//! reached at the same or a shallower depth.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use engine_core::{topic_title, GraphDataStore, Link, Page, StopSignal, StrategyError};
use similarity::SimilarityRanker;
use tracing::{debug, trace};

use crate::page_cache::PageCache;

/// One expanded page whose children are still being explored.
#[derive(Debug)]
struct Frame {
    depth: usize,
    path: Vec<String>,
    pending: VecDeque<String>,
}

/// Depth-limited search state for one `restart`.
#[derive(Debug, Default)]
struct Pass {
    limit: usize,
    max_depth: usize,
    max_breadth: usize,
    visited: HashMap<String, usize>,
    stack: Vec<Frame>,
}

pub struct IddfsPlanner {
    start: String,
    goal: String,
    max_pages: usize,
    ranker: SimilarityRanker,
    cache: PageCache,
    solutions: Vec<Vec<String>>,
    pass: Pass,
}

impl IddfsPlanner {
    pub fn new(
        start: &str,
        goal: &str,
        store: Arc<dyn GraphDataStore>,
        ranker: SimilarityRanker,
        max_pages: usize,
    ) -> Self {
        Self {
            start: start.to_string(),
            goal: goal.to_string(),
            max_pages,
            ranker,
            cache: PageCache::new(store),
            solutions: Vec::new(),
            pass: Pass::default(),
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Every solution yielded so far, oldest first. Never shrinks.
    pub fn solutions(&self) -> &[Vec<String>] {
        &self.solutions
    }

    /// Begin a fresh solve with depth limits `1..=max_depth`. Previously
    /// found solutions are kept and will not be yielded again.
    pub fn restart(&mut self, max_breadth: usize, max_depth: usize) {
        debug!(max_breadth, max_depth, "Starting solve");
        self.pass = Pass {
            limit: 0,
            max_depth,
            max_breadth,
            visited: HashMap::new(),
            stack: Vec::new(),
        };
    }

    /// Correct the cached links of `title` against the live page.
    pub fn fix_links(&mut self, title: &str, live: &[Link]) -> Result<usize, StrategyError> {
        Ok(self.cache.fix_links(title, live)?)
    }

    /// Continue the search until the next new solution. `None` means the
    /// current solve is exhausted (or the stop signal was raised).
    pub fn next_solution(&mut self, stop: &StopSignal) -> Result<Option<Vec<String>>, StrategyError> {
        loop {
            if stop.is_raised() {
                return Ok(None);
            }

            let next = match self.pass.stack.last_mut() {
                Some(frame) => match frame.pending.pop_front() {
                    Some(child) => {
                        let mut path = frame.path.clone();
                        path.push(child.clone());
                        Some((child, frame.depth + 1, path))
                    }
                    None => {
                        self.pass.stack.pop();
                        None
                    }
                },
                None => {
                    if self.pass.limit >= self.pass.max_depth {
                        return Ok(None);
                    }
                    self.pass.limit += 1;
                    self.pass.visited.clear();
                    debug!(limit = self.pass.limit, "Depth pass");
                    Some((self.start.clone(), 0, vec![self.start.clone()]))
                }
            };

            if let Some((title, depth, path)) = next {
                if let Some(solution) = self.visit(&title, depth, path)? {
                    return Ok(Some(solution));
                }
            }
        }
    }

    /// Run the current solve to exhaustion and return what it yielded.
    pub fn solve_all(&mut self, stop: &StopSignal) -> Result<Vec<Vec<String>>, StrategyError> {
        let mut found = Vec::new();
        while let Some(solution) = self.next_solution(stop)? {
            found.push(solution);
        }
        Ok(found)
    }

    fn visit(
        &mut self,
        title: &str,
        depth: usize,
        path: Vec<String>,
    ) -> Result<Option<Vec<String>>, StrategyError> {
        let page = self.cache.get_page(title)?;

        if page.links_to(&self.goal) {
            let mut solution = path;
            solution.push(self.goal.clone());
            if self.solutions.contains(&solution) {
                return Ok(None);
            }
            debug!(?solution, "Solution found");
            self.solutions.push(solution.clone());
            return Ok(Some(solution));
        }

        if self
            .pass
            .visited
            .get(title)
            .is_some_and(|seen| *seen <= depth)
        {
            return Ok(None);
        }
        self.pass.visited.insert(title.to_string(), depth);

        if depth + 1 >= self.pass.limit {
            return Ok(None);
        }

        let children = self.expand(&page)?;
        trace!(%title, depth, ?children, "Expanding");
        // Warm the cache with one batched fetch for all children
        self.cache.get_pages(&children)?;
        self.pass.stack.push(Frame {
            depth,
            path,
            pending: children.into(),
        });
        Ok(None)
    }

    /// Filter, rank against the goal and cut a page's links to the
    /// children worth exploring.
    fn expand(&self, page: &Page) -> Result<Vec<String>, StrategyError> {
        let mut seen: HashSet<&String> = HashSet::new();
        let candidates: Vec<&String> = page
            .links
            .iter()
            .filter(|link| !link.contains("disambiguation"))
            .filter(|link| seen.insert(*link))
            .take(self.max_pages)
            .collect();

        let mut by_title: HashMap<String, &String> = HashMap::new();
        let mut titles: Vec<String> = Vec::with_capacity(candidates.len());
        for topic in candidates {
            let title = topic_title(topic);
            by_title.entry(title.clone()).or_insert(topic);
            titles.push(title);
        }

        let ranked = self.ranker.rank(&titles, &topic_title(&self.goal))?;
        let mut chosen: Vec<String> = Vec::new();
        for (title, _) in ranked {
            if chosen.len() >= self.pass.max_breadth {
                break;
            }
            if let Some(&topic) = by_title.get(&title) {
                if !chosen.contains(topic) {
                    chosen.push(topic.clone());
                }
            }
        }
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::InMemoryGraphStore;
    use similarity::{EmbeddingCache, HashingEmbedder};

    fn planner(store: InMemoryGraphStore, start: &str, goal: &str) -> IddfsPlanner {
        let ranker =
            SimilarityRanker::new(Arc::new(HashingEmbedder::default()), EmbeddingCache::new());
        IddfsPlanner::new(start, goal, Arc::new(store), ranker, 250)
    }

    fn path(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_solution_at_depth_one() {
        let store = InMemoryGraphStore::new()
            .with_page("Start", &["B", "C"])
            .with_page("B", &["D"]);
        let mut planner = planner(store, "Start", "D");
        let stop = StopSignal::new();

        planner.restart(6, 1);
        assert_eq!(planner.next_solution(&stop).unwrap(), None);

        planner.restart(6, 2);
        assert_eq!(
            planner.next_solution(&stop).unwrap(),
            Some(path(&["Start", "B", "D"]))
        );
    }

    #[test]
    fn test_direct_link_needs_one_click() {
        let store = InMemoryGraphStore::new().with_page("Start", &["Goal"]);
        let mut planner = planner(store, "Start", "Goal");
        planner.restart(6, 1);
        assert_eq!(
            planner.solve_all(&StopSignal::new()).unwrap(),
            vec![path(&["Start", "Goal"])]
        );
    }

    #[test]
    fn test_solutions_grow_monotonically_with_depth() {
        let store = InMemoryGraphStore::new()
            .with_page("Start", &["A", "B"])
            .with_page("A", &["C"])
            .with_page("B", &["Goal"])
            .with_page("C", &["Goal"]);

        let mut shallow = planner(store.clone(), "Start", "Goal");
        shallow.restart(6, 2);
        shallow.solve_all(&StopSignal::new()).unwrap();

        let mut deep = planner(store, "Start", "Goal");
        deep.restart(6, 3);
        deep.solve_all(&StopSignal::new()).unwrap();

        assert_eq!(shallow.solutions(), &[path(&["Start", "B", "Goal"])]);
        for solution in shallow.solutions() {
            assert!(deep.solutions().contains(solution));
        }
        assert!(deep
            .solutions()
            .contains(&path(&["Start", "A", "C", "Goal"])));
    }

    #[test]
    fn test_duplicates_suppressed_across_restarts() {
        let store = InMemoryGraphStore::new()
            .with_page("Start", &["B"])
            .with_page("B", &["Goal"]);
        let mut planner = planner(store, "Start", "Goal");
        let stop = StopSignal::new();

        planner.restart(6, 3);
        assert_eq!(planner.solve_all(&stop).unwrap().len(), 1);

        planner.restart(7, 4);
        assert!(planner.solve_all(&stop).unwrap().is_empty());
        assert_eq!(planner.solutions().len(), 1);
    }

    #[test]
    fn test_disambiguation_links_are_skipped() {
        let store = InMemoryGraphStore::new()
            .with_page("Start", &["Mercury_(disambiguation)", "X"])
            .with_page("Mercury_(disambiguation)", &["Goal"]);
        let mut planner = planner(store, "Start", "Goal");
        planner.restart(6, 3);
        assert!(planner.solve_all(&StopSignal::new()).unwrap().is_empty());
    }

    #[test]
    fn test_breadth_keeps_best_ranked_children() {
        let store = InMemoryGraphStore::new()
            .with_page("Start", &["Banana", "Apple"])
            .with_page("Apple", &["Apple_pie"])
            .with_page("Banana", &["Apple_pie"]);
        let mut planner = planner(store, "Start", "Apple_pie");
        planner.restart(1, 2);
        assert_eq!(
            planner.solve_all(&StopSignal::new()).unwrap(),
            vec![path(&["Start", "Apple", "Apple_pie"])]
        );
    }

    #[test]
    fn test_fix_links_affects_later_expansion() {
        let store = InMemoryGraphStore::new()
            .with_page("Start", &["B"])
            .with_page("B", &["Goal"]);
        let mut planner = planner(store, "Start", "Goal");
        planner.fix_links("Start", &[Link::to_topic("Other")]).unwrap();

        planner.restart(6, 3);
        assert!(planner.solve_all(&StopSignal::new()).unwrap().is_empty());
    }

    #[test]
    fn test_stop_signal_ends_search() {
        let store = InMemoryGraphStore::new().with_page("Start", &["Goal"]);
        let mut planner = planner(store, "Start", "Goal");
        let stop = StopSignal::new();
        stop.raise();

        planner.restart(6, 3);
        assert_eq!(planner.next_solution(&stop).unwrap(), None);
    }
}
