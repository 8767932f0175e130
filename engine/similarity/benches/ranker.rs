//! Ranker benchmarks.
//!
//! Run with: `cargo bench -p similarity`
//!
//! Measures ranking a page-sized candidate list against a goal, both with a
//! cold cache (every label embedded) and a warm cache (pure scoring).

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use similarity::{EmbeddingCache, HashingEmbedder, SimilarityRanker};

fn labels(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Article number {}", i)).collect()
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for size in [10usize, 100, 250] {
        let candidates = labels(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("cold", size), &candidates, |b, cands| {
            b.iter(|| {
                let ranker = SimilarityRanker::new(
                    Arc::new(HashingEmbedder::default()),
                    EmbeddingCache::new(),
                );
                black_box(ranker.rank(cands, "Article number 7").unwrap())
            })
        });

        let warm = SimilarityRanker::new(Arc::new(HashingEmbedder::default()), EmbeddingCache::new());
        warm.rank(&candidates, "Article number 7").unwrap();
        group.bench_with_input(BenchmarkId::new("warm", size), &candidates, |b, cands| {
            b.iter(|| black_box(warm.rank(cands, "Article number 7").unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rank);
criterion_main!(benches);
