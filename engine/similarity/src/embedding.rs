//! Embedding provider trait.
//!
//! A provider turns text into fixed-size vectors. Implementations must be
//! deterministic: the same string always maps to the same vector, since the
//! ranker caches vectors and never asks for a string twice.

use thiserror::Error;

/// Errors that can occur while embedding text.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding model unavailable: {0}")]
    Unavailable(String),

    #[error("Embedding failed: {0}")]
    Failed(String),
}

/// Trait for text embedders.
///
/// Implementations could be:
/// - HashingEmbedder: Feature hashing over words and trigrams (offline, tests)
/// - A sentence-transformer served over the network
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts. The output is order-preserving: vector `i`
    /// belongs to `texts[i]`.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Length of every vector this provider returns.
    fn dimensions(&self) -> usize;
}

/// Deterministic feature-hashing embedder.
///
/// Each lower-cased word and each character trigram of the padded,
/// lower-cased text is hashed with FNV-1a into one of `dimensions` buckets.
/// The resulting count vector is L2 normalised, so identical strings score
/// exactly 1.0 and strings sharing words or spellings score high.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        let normalized = text.replace('_', " ").to_lowercase();

        for word in normalized.split(|c: char| !c.is_alphanumeric()) {
            if !word.is_empty() {
                // Whole words weigh more than trigrams
                vector[self.bucket(word.as_bytes())] += 2.0;
            }
        }

        let padded: Vec<char> = format!(" {} ", normalized.trim()).chars().collect();
        for window in padded.windows(3) {
            let trigram: String = window.iter().collect();
            vector[self.bucket(trigram.as_bytes())] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }

    fn bucket(&self, bytes: &[u8]) -> usize {
        (fnv1a(bytes) % self.dimensions as u64) as usize
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embed(embedder: &HashingEmbedder, text: &str) -> Vec<f32> {
        embedder.embed(&[text.to_string()]).unwrap().remove(0)
    }

    #[test]
    fn test_hashing_embedder_is_deterministic() {
        let embedder = HashingEmbedder::new(64);
        assert_eq!(embed(&embedder, "France"), embed(&embedder, "France"));
    }

    #[test]
    fn test_hashing_embedder_is_normalized() {
        let embedder = HashingEmbedder::default();
        let v = embed(&embedder, "Paris, France");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert_eq!(v.len(), embedder.dimensions());
    }

    #[test]
    fn test_underscores_match_spaces() {
        let embedder = HashingEmbedder::default();
        assert_eq!(
            embed(&embedder, "United_States"),
            embed(&embedder, "united states")
        );
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(16);
        let v = embed(&embedder, "");
        assert_eq!(v.len(), 16);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_batch_preserves_order() {
        let embedder = HashingEmbedder::default();
        let batch = embedder
            .embed(&["Dog".to_string(), "Cat".to_string()])
            .unwrap();
        assert_eq!(batch[0], embed(&embedder, "Dog"));
        assert_eq!(batch[1], embed(&embedder, "Cat"));
    }

    #[test]
    fn test_dimensions_never_zero() {
        assert_eq!(HashingEmbedder::new(0).dimensions(), 1);
    }
}
