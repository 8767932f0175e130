//! Session statistics tracking and persistence.
//!
//! Tallies finished games and writes a JSON snapshot to
//! `<data_dir>/actor_stats.json` after every game.

use engine_core::GameOutcome;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::time::Instant;
use tracing::{debug, warn};

/// Aggregated statistics over the games of one run.
#[derive(Debug)]
pub struct SessionStats {
    strategy: String,
    games_completed: u32,
    wins: u32,
    total_clicks: u64,
    total_backtracks: u64,
    start_time: Instant,
    stats_path: String,
}

/// Serializable stats for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStatsSnapshot {
    pub strategy: String,
    pub games_completed: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub avg_clicks: f64,
    pub avg_backtracks: f64,
    pub runtime_seconds: f64,
    pub timestamp: u64,
}

impl SessionStats {
    pub fn new(data_dir: &str, strategy: &str) -> Self {
        let stats_path = format!("{}/actor_stats.json", data_dir);

        if let Err(e) = fs::create_dir_all(data_dir) {
            warn!("Failed to create data directory: {}", e);
        }

        Self {
            strategy: strategy.to_string(),
            games_completed: 0,
            wins: 0,
            total_clicks: 0,
            total_backtracks: 0,
            start_time: Instant::now(),
            stats_path,
        }
    }

    pub fn record_game(&mut self, outcome: &GameOutcome) {
        self.games_completed += 1;
        if outcome.won {
            self.wins += 1;
        }
        self.total_clicks += outcome.clicks as u64;
        self.total_backtracks += outcome.backtracks as u64;
    }

    pub fn snapshot(&self) -> SessionStatsSnapshot {
        let games = self.games_completed as f64;
        let per_game = |total: f64| if games > 0.0 { total / games } else { 0.0 };

        SessionStatsSnapshot {
            strategy: self.strategy.clone(),
            games_completed: self.games_completed,
            wins: self.wins,
            win_rate: per_game(self.wins as f64),
            avg_clicks: per_game(self.total_clicks as f64),
            avg_backtracks: per_game(self.total_backtracks as f64),
            runtime_seconds: self.start_time.elapsed().as_secs_f64(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    /// Write stats to JSON file (atomic write-then-rename).
    pub fn write_stats(&self) {
        let snapshot = self.snapshot();

        let json = match serde_json::to_string_pretty(&snapshot) {
            Ok(j) => j,
            Err(e) => {
                warn!("Failed to serialize session stats: {}", e);
                return;
            }
        };

        let temp_path = format!("{}.tmp", self.stats_path);
        match fs::File::create(&temp_path) {
            Ok(mut file) => {
                if let Err(e) = file.write_all(json.as_bytes()) {
                    warn!("Failed to write session stats: {}", e);
                    return;
                }
            }
            Err(e) => {
                warn!("Failed to create temp stats file: {}", e);
                return;
            }
        }

        if let Err(e) = fs::rename(&temp_path, &self.stats_path) {
            warn!("Failed to rename stats file: {}", e);
            let _ = fs::remove_file(&temp_path);
            return;
        }

        debug!("Wrote session stats to {}", self.stats_path);
    }

    #[cfg(test)]
    pub fn stats_path(&self) -> &str {
        &self.stats_path
    }
}
