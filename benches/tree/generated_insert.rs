use compact_radix::{
    tests_common::{generate_key_with_prefixes, generate_keys_skewed},
    RadixTrie,
};
use criterion::{criterion_group, Criterion, Throughput};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::common::{fixed_length_keys, word_keys};

fn gen_group(c: &mut Criterion, group: &str, keys: Vec<Box<[u8]>>) {
    let mut group = c.benchmark_group(group);
    group.warm_up_time(std::time::Duration::from_secs(5));
    group.measurement_time(std::time::Duration::from_secs(15));
    group.throughput(Throughput::Bytes(keys.iter().map(|k| k.len() as u64).sum()));
    group.bench_function("insert", |b| {
        b.iter_batched(
            || keys.clone(),
            |keys| {
                let mut tree = RadixTrie::new();
                for (idx, key) in keys.into_iter().enumerate() {
                    tree.insert(&key, idx).unwrap();
                }
                tree
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(69420);

    let skewed: Vec<_> = generate_keys_skewed(u8::MAX as usize).collect();
    let with_prefixes: Vec<_> = generate_key_with_prefixes(u8::MAX as usize).collect();
    let fixed_length = fixed_length_keys();
    let mut shuffled_words = word_keys();
    shuffled_words.shuffle(&mut rng);

    gen_group(c, "generated_insert/skewed", skewed);
    gen_group(c, "generated_insert/with_prefixes", with_prefixes);
    gen_group(c, "generated_insert/fixed_length", fixed_length);
    gen_group(c, "generated_insert/shuffled_words", shuffled_words);
}

criterion_group!(bench_generated_insert_group, bench);
