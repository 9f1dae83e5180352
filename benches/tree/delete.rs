use criterion::{criterion_group, BatchSize, Criterion};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::common::{build_tree, fixed_length_keys, word_keys};

fn delete_all(c: &mut Criterion, name: &str, mut keys: Vec<Box<[u8]>>) {
    let mut rng = StdRng::seed_from_u64(69420);
    let tree = build_tree(&keys);
    keys.shuffle(&mut rng);

    let mut group = c.benchmark_group("delete");
    group.bench_function(format!("{name}/exact"), |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                for key in &keys {
                    tree.delete(key, true).unwrap();
                }
                tree
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function(format!("{name}/clear_by_prefix"), |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                tree.delete(b"", false).unwrap();
                tree
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench(c: &mut Criterion) {
    delete_all(c, "words", word_keys());
    delete_all(c, "fixed_length", fixed_length_keys());
}

criterion_group!(bench_delete_group, bench);
