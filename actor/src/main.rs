//! Actor - link game player
//!
//! A long-running process that:
//! 1. Loads a world (rounds plus link graph) for the simulated game
//! 2. Plays rounds with the configured strategy (greedy, biased, iddfs, mcts)
//! 3. Writes session statistics to `<data_dir>/actor_stats.json`

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

mod actor;
mod config;
mod stats;
mod storage;

use crate::actor::Actor;
use crate::config::Config;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let max_games_description = match config.game_limit() {
        Some(limit) => limit.to_string(),
        None => "unlimited".to_string(),
    };
    info!(
        strategy = %config.strategy,
        "Actor will play {} games", max_games_description
    );

    let actor = Actor::new(config)?;

    // Setup graceful shutdown
    let stop = actor.stop_signal();
    let shutdown_handle = tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl+c: {}", e);
            return;
        }
        info!("Shutdown signal received, stopping actor...");
        stop.raise();
    });

    // The game loop is synchronous and blocks between navigator commands
    let run_result = match tokio::task::spawn_blocking(move || actor.run()).await {
        Ok(result) => result,
        Err(e) => Err(anyhow::anyhow!("game loop panicked: {}", e)),
    };

    shutdown_handle.abort();

    match run_result {
        Ok(snapshot) => {
            info!(
                games = snapshot.games_completed,
                wins = snapshot.wins,
                "Actor completed successfully"
            );
            Ok(())
        }
        Err(e) => {
            error!("Actor failed: {}", e);
            Err(e)
        }
    }
}
