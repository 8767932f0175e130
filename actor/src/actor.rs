//! Actor: wires the navigator, ranker and chosen strategy together and plays
//! games until the stop signal is raised or the game limit is reached.

use anyhow::{Context, Result};
use engine_core::{
    GameRunner, SessionState, SimulatedNavigator, StopSignal, Strategy, World,
};
use explore::{BiasedStrategy, GreedyStrategy};
use iddfs::IddfsStrategy;
use indicatif::{ProgressBar, ProgressStyle};
use mcts::MctsStrategy;
use similarity::{EmbeddingCache, HashingEmbedder, SimilarityRanker};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::config::{Config, StrategyKind};
use crate::stats::{SessionStats, SessionStatsSnapshot};
use crate::storage::open_graph_store;

type BoxedStrategy = Box<dyn Strategy + Send>;

pub struct Actor {
    config: Config,
    runner: GameRunner<BoxedStrategy, SimulatedNavigator>,
    stop: StopSignal,
    stats: SessionStats,
}

impl Actor {
    pub fn new(config: Config) -> Result<Self> {
        let kind = config.strategy_kind()?;

        let world = World::load(Path::new(&config.world_path))
            .with_context(|| format!("failed to load world from {}", config.world_path))?;
        info!(
            rounds = world.rounds.len(),
            pages = world.pages.len(),
            "Loaded world"
        );

        let ranker = SimilarityRanker::new(
            Arc::new(HashingEmbedder::new(config.dimensions)),
            EmbeddingCache::new(),
        );
        let strategy = build_strategy(kind, &config, ranker, &world)?;
        info!(strategy = strategy.name(), bot = strategy.bot_name(), "Strategy ready");

        let navigator = SimulatedNavigator::new(world);
        let stop = StopSignal::new();
        let runner = GameRunner::new(strategy, navigator, config.runner_config(), stop.clone());
        let stats = SessionStats::new(&config.data_dir, &kind.to_string());

        Ok(Self {
            config,
            runner,
            stop,
            stats,
        })
    }

    /// Handle that stops the game loop when raised.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Play until stopped. Blocks the calling thread.
    pub fn run(mut self) -> Result<SessionStatsSnapshot> {
        info!(
            strategy = %self.config.strategy,
            max_games = self.config.max_games,
            "Actor starting main loop"
        );

        // Progress bar for bounded runs (only when stderr is a TTY)
        let progress = match self.config.game_limit() {
            Some(limit) if std::io::IsTerminal::is_terminal(&std::io::stderr()) => {
                let pb = ProgressBar::new(limit as u64);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} games ({msg})")
                {
                    pb.set_style(style.progress_chars("#>-"));
                }
                Some(pb)
            }
            _ => None,
        };

        let mut recorded = 0;
        loop {
            let state = self.runner.tick()?;

            let outcomes = self.runner.outcomes();
            if outcomes.len() > recorded {
                for outcome in &outcomes[recorded..] {
                    self.stats.record_game(outcome);
                }
                recorded = outcomes.len();
                self.stats.write_stats();

                if let Some(ref pb) = progress {
                    let snapshot = self.stats.snapshot();
                    pb.set_message(format!("{} wins", snapshot.wins));
                    pb.set_position(recorded as u64);
                }
            }

            if state == SessionState::Stopped {
                break;
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }

        let snapshot = self.stats.snapshot();
        info!(
            games = snapshot.games_completed,
            wins = snapshot.wins,
            avg_clicks = format!("{:.1}", snapshot.avg_clicks),
            "Actor stopped gracefully"
        );
        Ok(snapshot)
    }
}

fn build_strategy(
    kind: StrategyKind,
    config: &Config,
    ranker: SimilarityRanker,
    world: &World,
) -> Result<BoxedStrategy> {
    let strategy: BoxedStrategy = match kind {
        StrategyKind::Greedy => Box::new(GreedyStrategy::new(ranker, &config.explore_config())),
        StrategyKind::Biased => Box::new(BiasedStrategy::new(ranker, &config.explore_config())),
        StrategyKind::Iddfs => {
            let store = open_graph_store(&config.graph_db_path, world)?;
            Box::new(IddfsStrategy::new(ranker, store, config.iddfs_config()))
        }
        StrategyKind::Mcts => Box::new(MctsStrategy::new(ranker, config.mcts_config())),
    };
    Ok(strategy)
}
