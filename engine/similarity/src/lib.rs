//! Semantic similarity ranking for link labels.
//!
//! A [`SimilarityRanker`] scores candidate strings against a reference by
//! cosine similarity of their embeddings. Embeddings come from an
//! [`EmbeddingProvider`] and are memoised in an [`EmbeddingCache`] that is
//! shared by every strategy in the process.
//!
//! ```rust
//! use std::sync::Arc;
//! use similarity::{EmbeddingCache, HashingEmbedder, SimilarityRanker};
//!
//! let ranker = SimilarityRanker::new(Arc::new(HashingEmbedder::default()), EmbeddingCache::new());
//! let candidates = vec!["Paris".to_string(), "Dog".to_string(), "France".to_string()];
//! let ranked = ranker.rank(&candidates, "France").unwrap();
//! assert_eq!(ranked[0].0, "France");
//! ```

pub mod cache;
pub mod embedding;
pub mod ranker;

pub use cache::EmbeddingCache;
pub use embedding::{EmbeddingError, EmbeddingProvider, HashingEmbedder};
pub use ranker::{cosine_similarity, RankError, SimilarityRanker};
