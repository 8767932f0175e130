//! Title-keyed cache in front of the graph data store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use engine_core::{GraphDataStore, GraphStoreError, Link, Page};
use tracing::debug;

/// Pages fetched from a [`GraphDataStore`], kept for the lifetime of one
/// planner. Only titles not cached yet are sent to the store.
pub struct PageCache {
    store: Arc<dyn GraphDataStore>,
    pages: HashMap<String, Page>,
}

impl PageCache {
    pub fn new(store: Arc<dyn GraphDataStore>) -> Self {
        Self {
            store,
            pages: HashMap::new(),
        }
    }

    /// Pages for `titles`, in order, fetching the uncached ones in one call.
    pub fn get_pages(&mut self, titles: &[String]) -> Result<Vec<Page>, GraphStoreError> {
        let mut missing: Vec<String> = Vec::new();
        for title in titles {
            if !self.pages.contains_key(title) && !missing.contains(title) {
                missing.push(title.clone());
            }
        }

        if !missing.is_empty() {
            debug!(count = missing.len(), "Fetching pages");
            for page in self.store.fetch_pages(&missing)? {
                self.pages.entry(page.title.clone()).or_insert(page);
            }
        }

        Ok(titles
            .iter()
            .map(|title| {
                self.pages
                    .get(title)
                    .cloned()
                    .unwrap_or_else(|| Page::empty(title.clone()))
            })
            .collect())
    }

    pub fn get_page(&mut self, title: &str) -> Result<Page, GraphStoreError> {
        let mut pages = self.get_pages(&[title.to_string()])?;
        Ok(pages.pop().unwrap_or_else(|| Page::empty(title)))
    }

    /// Drop stored links of `title` that the live page does not show.
    /// Returns how many links were removed. An empty live list (page still
    /// loading) leaves the stored links alone.
    pub fn fix_links(&mut self, title: &str, live: &[Link]) -> Result<usize, GraphStoreError> {
        if live.is_empty() {
            return Ok(0);
        }
        self.get_page(title)?;

        let live: HashSet<&str> = live.iter().map(Link::topic).collect();
        let Some(page) = self.pages.get_mut(title) else {
            return Ok(0);
        };
        let before = page.links.len();
        page.links.retain(|link| live.contains(link.as_str()));

        let removed = before - page.links.len();
        if removed > 0 {
            debug!(%title, removed, "Dropped links missing from live page");
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
