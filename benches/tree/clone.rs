use crate::common::{with_prefixes_tree, words_tree};
use criterion::{criterion_group, Criterion};

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("clone");

    let with_prefixes_tree = with_prefixes_tree();
    let words_tree = words_tree();

    group.bench_function("with_prefixes", |b| b.iter(|| with_prefixes_tree.clone()));
    group.bench_function("words", |b| b.iter(|| words_tree.clone()));
}

criterion_group!(bench_clone_group, criterion_benchmark);
