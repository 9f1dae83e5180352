use criterion::criterion_main;

mod common;
mod tree;

criterion_main!(
    tree::clone::bench_clone_group,
    tree::delete::bench_delete_group,
    tree::generated_insert::bench_generated_insert_group,
    tree::search::bench_search_group,
);
