//! SQLite backend for the offline link graph.
//!
//! Mirrors the layout of a wiki database dump: `page` rows, `redirect` rows
//! pointing a page at its canonical title, and `pagelink` rows. A title's
//! links are its own links plus those of its redirect target, article
//! namespace only.

use engine_core::{GraphDataStore, GraphStoreError, Page};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Namespace of regular articles.
const ARTICLE_NAMESPACE: i64 = 0;

const LINKS_QUERY: &str = "
    SELECT pl.title
    FROM page p
    LEFT JOIN redirect r ON r.from_id = p.id
    LEFT JOIN page p2 ON p2.title = r.title
    JOIN pagelink pl ON pl.from_id = p.id OR pl.from_id = p2.id
    WHERE p.title = ?1 AND pl.namespace = ?2
    ORDER BY pl.rowid";

/// SQLite-based graph store.
///
/// Uses a Mutex for thread-safety since rusqlite Connection is not Sync.
pub struct SqliteGraphStore {
    conn: Mutex<Connection>,
}

impl SqliteGraphStore {
    /// Open a graph database, creating the schema if needed.
    pub fn open(db_path: &str) -> Result<Self, GraphStoreError> {
        // Create parent directories if they don't exist
        if let Some(parent) = Path::new(db_path).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GraphStoreError::Unavailable(e.to_string()))?;
        }

        let conn =
            Connection::open(db_path).map_err(|e| GraphStoreError::Unavailable(e.to_string()))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS page (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS redirect (
                from_id INTEGER NOT NULL,
                title TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS pagelink (
                from_id INTEGER NOT NULL,
                namespace INTEGER NOT NULL,
                title TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_redirect_from ON redirect(from_id);
            CREATE INDEX IF NOT EXISTS idx_pagelink_from ON pagelink(from_id);",
        )
        .map_err(query_error)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, GraphStoreError> {
        self.conn
            .lock()
            .map_err(|e| GraphStoreError::Unavailable(format!("Lock poisoned: {}", e)))
    }

    fn fetch_page(conn: &Connection, title: &str) -> Result<Page, GraphStoreError> {
        let known: Option<i64> = conn
            .query_row(
                "SELECT id FROM page WHERE title = ?1",
                params![title],
                |row| row.get(0),
            )
            .optional()
            .map_err(query_error)?;
        if known.is_none() {
            return Ok(Page::empty(title));
        }

        let mut stmt = conn.prepare_cached(LINKS_QUERY).map_err(query_error)?;
        let rows = stmt
            .query_map(params![title, ARTICLE_NAMESPACE], |row| row.get::<_, String>(0))
            .map_err(query_error)?;

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for link in rows {
            let link = link.map_err(query_error)?;
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }
        Ok(Page::new(title, links))
    }
}

/// Seeding helpers for tests.
#[cfg(test)]
impl SqliteGraphStore {
    fn page_id(conn: &Connection, title: &str) -> Result<i64, GraphStoreError> {
        conn.execute(
            "INSERT OR IGNORE INTO page (title) VALUES (?1)",
            params![title],
        )
        .map_err(query_error)?;
        conn.query_row(
            "SELECT id FROM page WHERE title = ?1",
            params![title],
            |row| row.get(0),
        )
        .map_err(query_error)
    }

    /// Insert a page with article-namespace links.
    pub fn insert_page(&self, title: &str, links: &[&str]) -> Result<(), GraphStoreError> {
        let conn = self.lock()?;
        let id = Self::page_id(&conn, title)?;
        for link in links {
            conn.execute(
                "INSERT INTO pagelink (from_id, namespace, title) VALUES (?1, ?2, ?3)",
                params![id, ARTICLE_NAMESPACE, link],
            )
            .map_err(query_error)?;
        }
        Ok(())
    }

    /// Insert a link outside the article namespace.
    pub fn insert_namespaced_link(
        &self,
        title: &str,
        namespace: i64,
        link: &str,
    ) -> Result<(), GraphStoreError> {
        let conn = self.lock()?;
        let id = Self::page_id(&conn, title)?;
        conn.execute(
            "INSERT INTO pagelink (from_id, namespace, title) VALUES (?1, ?2, ?3)",
            params![id, namespace, link],
        )
        .map_err(query_error)?;
        Ok(())
    }

    /// Make `title` redirect to `target`.
    pub fn insert_redirect(&self, title: &str, target: &str) -> Result<(), GraphStoreError> {
        let conn = self.lock()?;
        let id = Self::page_id(&conn, title)?;
        conn.execute(
            "INSERT INTO redirect (from_id, title) VALUES (?1, ?2)",
            params![id, target],
        )
        .map_err(query_error)?;
        Ok(())
    }
}

fn query_error(e: rusqlite::Error) -> GraphStoreError {
    GraphStoreError::Query(e.to_string())
}

impl GraphDataStore for SqliteGraphStore {
    fn fetch_pages(&self, titles: &[String]) -> Result<Vec<Page>, GraphStoreError> {
        let conn = self.lock()?;
        titles
            .iter()
            .map(|title| Self::fetch_page(&conn, title))
            .collect()
    }
}
