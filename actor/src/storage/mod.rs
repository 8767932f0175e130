//! Offline link graph storage for the actor.
//!
//! IDDFS plans against a precomputed link graph. When a SQLite graph dump is
//! present it is used; otherwise the world file's own graph stands in.

mod sqlite;

pub use sqlite::SqliteGraphStore;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use engine_core::{GraphDataStore, World};
use tracing::info;

/// Open the graph store for IDDFS planning.
pub fn open_graph_store(db_path: &str, world: &World) -> Result<Arc<dyn GraphDataStore>> {
    if Path::new(db_path).exists() {
        let store = SqliteGraphStore::open(db_path)
            .with_context(|| format!("failed to open graph database {}", db_path))?;
        info!(path = %db_path, "Using SQLite graph store");
        Ok(Arc::new(store))
    } else {
        info!(pages = world.pages.len(), "Using the world's link graph");
        Ok(Arc::new(world.graph_store()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_falls_back_to_world_graph() {
        let world = World::from_json(r#"{"pages": {"A": ["B"]}}"#).unwrap();
        let store = open_graph_store("/nonexistent/graph.sqlite", &world).unwrap();

        let pages = store.fetch_pages(&["A".to_string()]).unwrap();
        assert_eq!(pages[0].links, vec!["B"]);
    }

    #[test]
    fn test_prefers_existing_database() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("graph.sqlite");
        let db = SqliteGraphStore::open(db_path.to_str().unwrap()).unwrap();
        db.insert_page("A", &["C"]).unwrap();
        drop(db);

        let world = World::from_json(r#"{"pages": {"A": ["B"]}}"#).unwrap();
        let store = open_graph_store(db_path.to_str().unwrap(), &world).unwrap();

        let pages = store.fetch_pages(&["A".to_string()]).unwrap();
        assert_eq!(pages[0].links, vec!["C"]);
    }
}
