//! Offline link graph access.
//!
//! A graph data store answers "which topics does this page link to?" without
//! a browser round-trip. Missing titles are not errors: they come back as
//! pages with no outgoing links.

use std::collections::HashMap;

use thiserror::Error;

use crate::model::Page;

#[derive(Debug, Error)]
pub enum GraphStoreError {
    #[error("Graph store unavailable: {0}")]
    Unavailable(String),

    #[error("Graph store query failed: {0}")]
    Query(String),
}

/// Read access to a precomputed page graph.
pub trait GraphDataStore: Send + Sync {
    /// Fetch pages in request order. Unknown titles yield [`Page::empty`].
    fn fetch_pages(&self, titles: &[String]) -> Result<Vec<Page>, GraphStoreError>;
}

/// Graph store backed by an in-memory adjacency map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraphStore {
    pages: HashMap<String, Vec<String>>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_adjacency(pages: HashMap<String, Vec<String>>) -> Self {
        Self { pages }
    }

    /// Builder pattern: add a page and its outgoing links.
    pub fn with_page(mut self, title: &str, links: &[&str]) -> Self {
        self.insert(title, links.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn insert(&mut self, title: &str, links: Vec<String>) {
        self.pages.insert(title.to_string(), links);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl GraphDataStore for InMemoryGraphStore {
    fn fetch_pages(&self, titles: &[String]) -> Result<Vec<Page>, GraphStoreError> {
        Ok(titles
            .iter()
            .map(|title| match self.pages.get(title) {
                Some(links) => Page::new(title.clone(), links.clone()),
                None => Page::empty(title.clone()),
            })
            .collect())
    }
}
