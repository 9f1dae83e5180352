use std::hint::black_box;

use criterion::{criterion_group, Criterion};
use rand::{rngs::StdRng, seq::IndexedRandom, SeedableRng};

use crate::common::{build_tree, word_keys};

fn bench(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(69420);
    let keys = word_keys();
    let tree = build_tree(&keys);

    let searches: Vec<_> = keys.choose_multiple(&mut rng, 1_000).cloned().collect();
    let prefixes: Vec<_> = searches
        .iter()
        .map(|key| key[..key.len() - 1].to_vec())
        .collect();

    let mut group = c.benchmark_group("search");
    group.bench_function("exact", |b| {
        b.iter(|| {
            for search in &searches {
                black_box(tree.search(search, true));
            }
        });
    });
    group.bench_function("get", |b| {
        b.iter(|| {
            for search in &searches {
                black_box(tree.get(search));
            }
        });
    });
    group.bench_function("prefix", |b| {
        b.iter(|| {
            for prefix in &prefixes {
                black_box(tree.search(prefix, false));
            }
        });
    });
}

criterion_group!(bench_search_group, bench);
