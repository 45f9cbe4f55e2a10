//! Benchmarks for the clustered ensemble.

use clusens_ensemble::{Config, EnsembleCoordinator};
use clusens_learner::LearnerConfig;
use clusens_stream::{IndexConfig, Item, MicroClusterIndex};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Labeled items drawn from `blobs` well-separated blobs in `dim` dimensions.
fn generate_stream(n: usize, blobs: usize, dim: usize) -> Vec<Item> {
    let mut rng = StdRng::seed_from_u64(1);
    (0..n)
        .map(|i| {
            let blob = i % blobs;
            let features = (0..dim)
                .map(|d| blob as f64 * 10.0 + d as f64 * 0.1 + rng.gen_range(-0.3..0.3))
                .collect();
            Item::labeled(features, blob % 3)
        })
        .collect()
}

fn trained(stream: &[Item]) -> EnsembleCoordinator<MicroClusterIndex> {
    let mut ens = EnsembleCoordinator::with_micro_clusters(
        Config::default(),
        IndexConfig::default(),
        LearnerConfig::default(),
    );
    for item in stream {
        ens.train(item).unwrap();
    }
    ens
}

fn bench_train(c: &mut Criterion) {
    let mut group = c.benchmark_group("ensemble_train");
    for blobs in [4, 16, 64].iter() {
        let stream = generate_stream(1000, *blobs, 8);
        group.bench_with_input(BenchmarkId::new("blobs", blobs), blobs, |b, _| {
            b.iter(|| black_box(trained(&stream)));
        });
    }
    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("ensemble_predict");
    for blobs in [4, 16, 64].iter() {
        let stream = generate_stream(1000, *blobs, 8);
        let ens = trained(&stream);
        let queries = generate_stream(100, *blobs, 8);
        group.bench_with_input(BenchmarkId::new("blobs", blobs), blobs, |b, _| {
            b.iter(|| {
                for q in &queries {
                    black_box(ens.predict(black_box(q)));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_train, bench_predict);
criterion_main!(benches);
