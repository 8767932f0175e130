//! Process-wide embedding cache.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Shared, append-only map from text to its embedding.
///
/// Cloning the cache clones the handle, not the contents: every strategy and
/// every game in a run can hold a clone and see the same vectors. Entries are
/// never evicted.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingCache {
    inner: Arc<RwLock<HashMap<String, Arc<[f32]>>>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, text: &str) -> Option<Arc<[f32]>> {
        self.read().get(text).cloned()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.read().contains_key(text)
    }

    /// Insert a vector for `text`. Re-inserting a cached string keeps the
    /// first vector and returns it.
    pub fn insert(&self, text: String, vector: Vec<f32>) -> Arc<[f32]> {
        let mut map = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        map.entry(text).or_insert_with(|| Arc::from(vector)).clone()
    }

    /// Which of `texts` are not cached yet, deduplicated, in first-seen order.
    pub fn missing<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let map = self.read();
        let mut missing: Vec<String> = Vec::new();
        for text in texts {
            if !map.contains_key(text) && !missing.iter().any(|m| m == text) {
                missing.push(text.to_string());
            }
        }
        missing
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<[f32]>>> {
        // A panic while holding the lock cannot leave a half-written entry
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
