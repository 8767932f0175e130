//! Cosine-similarity ranking of candidate strings against a reference.

use std::cmp::Ordering;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::cache::EmbeddingCache;
use crate::embedding::{EmbeddingError, EmbeddingProvider};

#[derive(Debug, Error)]
pub enum RankError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("Provider returned {got} vectors for {expected} texts")]
    EmbeddingCountMismatch { expected: usize, got: usize },
}

/// Ranks candidate labels by semantic closeness to a reference string.
///
/// Vectors come from the shared [`EmbeddingCache`]; anything missing is
/// embedded in a single batched provider call per `rank` invocation.
#[derive(Clone)]
pub struct SimilarityRanker {
    provider: Arc<dyn EmbeddingProvider>,
    cache: EmbeddingCache,
}

impl SimilarityRanker {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, cache: EmbeddingCache) -> Self {
        Self { provider, cache }
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// Score every candidate against `reference`, best first.
    ///
    /// Ties keep input order. Duplicate candidates are scored and returned
    /// once per occurrence.
    pub fn rank(
        &self,
        candidates: &[String],
        reference: &str,
    ) -> Result<Vec<(String, f32)>, RankError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        self.ensure_cached(
            candidates
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(reference)),
        )?;

        let reference_vec = self.vector(reference);
        let mut ranked: Vec<(String, f32)> = candidates
            .iter()
            .map(|c| {
                let score = cosine_similarity(&self.vector(c), &reference_vec);
                (c.clone(), score)
            })
            .collect();

        // sort_by is stable, so equal scores keep input order
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        Ok(ranked)
    }

    /// The single highest-scoring candidate, or `None` for no candidates.
    pub fn best(
        &self,
        candidates: &[String],
        reference: &str,
    ) -> Result<Option<(String, f32)>, RankError> {
        Ok(self.rank(candidates, reference)?.into_iter().next())
    }

    /// Similarity of one pair.
    pub fn similarity(&self, candidate: &str, reference: &str) -> Result<f32, RankError> {
        self.ensure_cached([candidate, reference])?;
        Ok(cosine_similarity(
            &self.vector(candidate),
            &self.vector(reference),
        ))
    }

    fn ensure_cached<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> Result<(), RankError> {
        let missing = self.cache.missing(texts);
        if missing.is_empty() {
            return Ok(());
        }

        debug!(count = missing.len(), "Embedding uncached texts");
        let vectors = self.provider.embed(&missing)?;
        if vectors.len() != missing.len() {
            return Err(RankError::EmbeddingCountMismatch {
                expected: missing.len(),
                got: vectors.len(),
            });
        }

        for (text, vector) in missing.into_iter().zip(vectors) {
            self.cache.insert(text, vector);
        }
        Ok(())
    }

    fn vector(&self, text: &str) -> Arc<[f32]> {
        // ensure_cached ran first; an empty vector only scores 0.0
        self.cache.get(text).unwrap_or_else(|| Arc::from(Vec::new()))
    }
}

/// Cosine similarity in [-1, 1]. Zero or mismatched vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;
    use std::sync::Mutex;

    /// Wraps the hashing embedder and records every string it is asked for.
    struct CountingProvider {
        inner: HashingEmbedder,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                inner: HashingEmbedder::default(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn embedded(&self) -> Vec<String> {
            self.calls.lock().unwrap().concat()
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl EmbeddingProvider for CountingProvider {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.calls.lock().unwrap().push(texts.to_vec());
            self.inner.embed(texts)
        }

        fn dimensions(&self) -> usize {
            self.inner.dimensions()
        }
    }

    /// Always returns one vector too few.
    struct ShortProvider;

    impl EmbeddingProvider for ShortProvider {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(vec![vec![1.0]; texts.len().saturating_sub(1)])
        }

        fn dimensions(&self) -> usize {
            1
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn ranker() -> SimilarityRanker {
        SimilarityRanker::new(Arc::new(HashingEmbedder::default()), EmbeddingCache::new())
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let ranked = ranker()
            .rank(&strings(&["Paris", "Dog", "France"]), "France")
            .unwrap();
        assert_eq!(ranked[0].0, "France");
        assert!((ranked[0].1 - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rank_is_total_and_sorted() {
        let candidates = strings(&["Paris", "Dog", "France", "Dog", "Napoleon"]);
        let ranked = ranker().rank(&candidates, "French Republic").unwrap();

        assert_eq!(ranked.len(), candidates.len());
        let mut names: Vec<String> = ranked.iter().map(|(c, _)| c.clone()).collect();
        let mut expected = candidates.clone();
        names.sort();
        expected.sort();
        assert_eq!(names, expected);
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_rank_is_idempotent() {
        let r = ranker();
        let candidates = strings(&["Alpha", "Beta", "Gamma", "Delta"]);
        let first = r.rank(&candidates, "Greek alphabet").unwrap();
        let second = r.rank(&candidates, "Greek alphabet").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ties_keep_input_order() {
        // Same string twice scores identically
        let ranked = ranker()
            .rank(&strings(&["Zebra", "Moon", "Moon"]), "Moon")
            .unwrap();
        assert_eq!(ranked[0].0, "Moon");
        assert_eq!(ranked[1].0, "Moon");
        assert_eq!(ranked[2].0, "Zebra");
    }

    #[test]
    fn test_empty_candidates() {
        let provider = Arc::new(CountingProvider::new());
        let r = SimilarityRanker::new(provider.clone(), EmbeddingCache::new());

        assert!(r.rank(&[], "France").unwrap().is_empty());
        assert!(r.best(&[], "France").unwrap().is_none());
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_cache_consulted_before_embedding() {
        let provider = Arc::new(CountingProvider::new());
        let cache = EmbeddingCache::new();
        let greedy = SimilarityRanker::new(provider.clone(), cache.clone());
        let mcts = SimilarityRanker::new(provider.clone(), cache);

        greedy.rank(&strings(&["Paris", "Dog"]), "France").unwrap();
        mcts.rank(&strings(&["Dog", "Cat", "Paris"]), "France").unwrap();

        let mut embedded = provider.embedded();
        embedded.sort();
        assert_eq!(embedded, strings(&["Cat", "Dog", "France", "Paris"]));
        // One batched call per invocation
        assert_eq!(provider.call_count(), 2);
    }

    #[test]
    fn test_fully_cached_rank_skips_provider() {
        let provider = Arc::new(CountingProvider::new());
        let r = SimilarityRanker::new(provider.clone(), EmbeddingCache::new());

        r.rank(&strings(&["A", "B"]), "C").unwrap();
        r.rank(&strings(&["B", "A"]), "C").unwrap();
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_best_and_similarity_agree() {
        let r = ranker();
        let candidates = strings(&["Rome", "Roman Empire", "Pizza"]);
        let (best, score) = r.best(&candidates, "Roman Empire").unwrap().unwrap();
        assert_eq!(best, "Roman Empire");
        assert_eq!(score, r.similarity("Roman Empire", "Roman Empire").unwrap());
    }

    #[test]
    fn test_count_mismatch_is_error() {
        let r = SimilarityRanker::new(Arc::new(ShortProvider), EmbeddingCache::new());
        let err = r.rank(&strings(&["A"]), "B").unwrap_err();
        assert!(matches!(
            err,
            RankError::EmbeddingCountMismatch {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn test_cosine_similarity_edges() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&[3.0, 4.0], &[3.0, 4.0]) - 1.0).abs() < 1e-6);
    }
}
